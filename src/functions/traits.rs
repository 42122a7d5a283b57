use crate::types::{DataType, Value};
use anyhow::Result;

/// Primitive function callable from an executable expression
pub trait Primitive: Send + Sync {
    fn alias(&self) -> &'static str;
    fn arity(&self) -> usize;
    fn input_types(&self) -> Vec<DataType>;
    fn output_type(&self) -> DataType;

    /// Apply to already-evaluated arguments
    fn execute(&self, args: &[Value]) -> Result<Value>;
}
