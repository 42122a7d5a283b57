use crate::functions::traits::Primitive;
use crate::types::{DataType, Value};
use anyhow::{anyhow, Result};

fn float_arg(args: &[Value], index: usize, alias: &str) -> Result<f64> {
    args.get(index)
        .and_then(Value::as_float)
        .ok_or_else(|| anyhow!("{} expects a float at argument {}", alias, index))
}

fn bool_arg(args: &[Value], index: usize, alias: &str) -> Result<bool> {
    args.get(index)
        .and_then(Value::as_bool)
        .ok_or_else(|| anyhow!("{} expects a bool at argument {}", alias, index))
}

// --- Arithmetic ---
pub struct Add;

impl Primitive for Add {
    fn alias(&self) -> &'static str { "Add" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float, DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Float(float_arg(args, 0, "Add")? + float_arg(args, 1, "Add")?))
    }
}

pub struct Sub;

impl Primitive for Sub {
    fn alias(&self) -> &'static str { "Sub" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float, DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Float(float_arg(args, 0, "Sub")? - float_arg(args, 1, "Sub")?))
    }
}

pub struct Mul;

impl Primitive for Mul {
    fn alias(&self) -> &'static str { "Mul" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float, DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Float(float_arg(args, 0, "Mul")? * float_arg(args, 1, "Mul")?))
    }
}

/// Protected division: a near-zero divisor yields 1.0
pub struct Div;

impl Primitive for Div {
    fn alias(&self) -> &'static str { "Div" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float, DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        let num = float_arg(args, 0, "Div")?;
        let den = float_arg(args, 1, "Div")?;
        if den.abs() < 1e-9 {
            return Ok(Value::Float(1.0));
        }
        Ok(Value::Float(num / den))
    }
}

pub struct Neg;

impl Primitive for Neg {
    fn alias(&self) -> &'static str { "Neg" }
    fn arity(&self) -> usize { 1 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Float(-float_arg(args, 0, "Neg")?))
    }
}

pub struct Sin;

impl Primitive for Sin {
    fn alias(&self) -> &'static str { "Sin" }
    fn arity(&self) -> usize { 1 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Float(float_arg(args, 0, "Sin")?.sin()))
    }
}

pub struct Cos;

impl Primitive for Cos {
    fn alias(&self) -> &'static str { "Cos" }
    fn arity(&self) -> usize { 1 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Float(float_arg(args, 0, "Cos")?.cos()))
    }
}

/// Exponential with the exponent clamped to keep results finite
pub struct Exp;

impl Primitive for Exp {
    fn alias(&self) -> &'static str { "Exp" }
    fn arity(&self) -> usize { 1 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Float(float_arg(args, 0, "Exp")?.min(50.0).exp()))
    }
}

/// Protected natural log: ln(|x|), 0 at x = 0
pub struct Log;

impl Primitive for Log {
    fn alias(&self) -> &'static str { "Log" }
    fn arity(&self) -> usize { 1 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        let x = float_arg(args, 0, "Log")?.abs();
        if x < 1e-9 {
            return Ok(Value::Float(0.0));
        }
        Ok(Value::Float(x.ln()))
    }
}

// --- Comparison ---
pub struct GreaterThan;

impl Primitive for GreaterThan {
    fn alias(&self) -> &'static str { "Gt" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float, DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Bool }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Bool(float_arg(args, 0, "Gt")? > float_arg(args, 1, "Gt")?))
    }
}

pub struct LessThan;

impl Primitive for LessThan {
    fn alias(&self) -> &'static str { "Lt" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Float, DataType::Float] }
    fn output_type(&self) -> DataType { DataType::Bool }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Bool(float_arg(args, 0, "Lt")? < float_arg(args, 1, "Lt")?))
    }
}

// --- Logic ---
pub struct And;

impl Primitive for And {
    fn alias(&self) -> &'static str { "And" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Bool, DataType::Bool] }
    fn output_type(&self) -> DataType { DataType::Bool }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Bool(bool_arg(args, 0, "And")? && bool_arg(args, 1, "And")?))
    }
}

pub struct Or;

impl Primitive for Or {
    fn alias(&self) -> &'static str { "Or" }
    fn arity(&self) -> usize { 2 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Bool, DataType::Bool] }
    fn output_type(&self) -> DataType { DataType::Bool }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Bool(bool_arg(args, 0, "Or")? || bool_arg(args, 1, "Or")?))
    }
}

pub struct Not;

impl Primitive for Not {
    fn alias(&self) -> &'static str { "Not" }
    fn arity(&self) -> usize { 1 }
    fn input_types(&self) -> Vec<DataType> { vec![DataType::Bool] }
    fn output_type(&self) -> DataType { DataType::Bool }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Bool(!bool_arg(args, 0, "Not")?))
    }
}

/// Conditional: If(cond, then, else)
pub struct IfElse;

impl Primitive for IfElse {
    fn alias(&self) -> &'static str { "If" }
    fn arity(&self) -> usize { 3 }
    fn input_types(&self) -> Vec<DataType> {
        vec![DataType::Bool, DataType::Float, DataType::Float]
    }
    fn output_type(&self) -> DataType { DataType::Float }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        let branch = if bool_arg(args, 0, "If")? { 1 } else { 2 };
        Ok(Value::Float(float_arg(args, branch, "If")?))
    }
}
