use crate::{
    error::{GpError, Result},
    functions::{registry::FunctionRegistry, traits::Primitive},
    types::{AstNode, Value},
};
use std::{collections::HashMap, sync::Arc};

/// Variable bindings for one evaluation
pub type Bindings = HashMap<String, Value>;

/// Interprets executable expressions against a function registry
pub struct ExpressionEvaluator {
    registry: Arc<FunctionRegistry>,
}

impl ExpressionEvaluator {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    pub fn evaluate(&self, ast: &AstNode, bindings: &Bindings) -> Result<Value> {
        match ast {
            AstNode::Const(value) => Ok(*value),
            AstNode::Var(name) => bindings
                .get(name)
                .copied()
                .ok_or_else(|| GpError::Evaluation(format!("Unbound variable {}", name))),
            AstNode::Call { function, args } => self.evaluate_call(function, args, bindings),
        }
    }

    pub fn evaluate_float(&self, ast: &AstNode, bindings: &Bindings) -> Result<f64> {
        let value = self.evaluate(ast, bindings)?;
        value.as_float().ok_or_else(|| {
            GpError::Evaluation(format!("Expected a float result, got {}", value))
        })
    }

    fn evaluate_call(&self, function: &str, args: &[AstNode], bindings: &Bindings) -> Result<Value> {
        let primitive = self
            .registry
            .get_primitive(function)
            .ok_or_else(|| GpError::Evaluation(format!("Function {} not found", function)))?;

        if primitive.arity() != args.len() {
            return Err(GpError::Evaluation(format!(
                "{} expects {} arguments, got {}",
                function,
                primitive.arity(),
                args.len()
            )));
        }

        let values = args
            .iter()
            .map(|arg| self.evaluate(arg, bindings))
            .collect::<Result<Vec<_>>>()?;
        for (index, (value, expected)) in values.iter().zip(primitive.input_types()).enumerate() {
            if value.data_type() != expected {
                return Err(GpError::Evaluation(format!(
                    "{} expects {:?} at argument {}, got {}",
                    function, expected, index, value
                )));
            }
        }
        self.apply(primitive.as_ref(), &values)
    }

    fn apply(&self, primitive: &dyn Primitive, values: &[Value]) -> Result<Value> {
        primitive
            .execute(values)
            .map_err(|e| GpError::Evaluation(e.to_string()))
    }
}
