use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime data type of a primitive argument or result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Float, // Scalar f64
    Bool,  // Scalar bool
}

/// Executable expression produced from a derivation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstNode {
    Const(Value),
    Var(String),
    Call {
        function: String,
        args: Vec<AstNode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Float(_) => DataType::Float,
            Value::Bool(_) => DataType::Bool,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Float(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl AstNode {
    pub fn var(name: impl Into<String>) -> Self {
        AstNode::Var(name.into())
    }

    pub fn float(value: f64) -> Self {
        AstNode::Const(Value::Float(value))
    }

    pub fn call(function: impl Into<String>, args: Vec<AstNode>) -> Self {
        AstNode::Call {
            function: function.into(),
            args,
        }
    }

    /// Formula string clipped to `max_len` characters, for log lines
    pub fn to_formula_short(&self, max_len: usize) -> String {
        let full = self.to_string();
        if full.chars().count() <= max_len {
            return full;
        }
        let mut clipped: String = full.chars().take(max_len.saturating_sub(3)).collect();
        clipped.push_str("...");
        clipped
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Const(value) => write!(f, "{}", value),
            AstNode::Var(name) => write!(f, "{}", name),
            AstNode::Call { function, args } => {
                write!(f, "{}(", function)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_display() {
        let expr = AstNode::call("Add", vec![AstNode::var("x"), AstNode::float(1.5)]);
        assert_eq!(expr.to_string(), "Add(x, 1.5)");
    }

    #[test]
    fn test_formula_short_clips() {
        let expr = AstNode::call(
            "Mul",
            vec![
                AstNode::call("Add", vec![AstNode::var("x"), AstNode::var("x")]),
                AstNode::var("x"),
            ],
        );
        let short = expr.to_formula_short(10);
        assert_eq!(short.chars().count(), 10);
        assert!(short.ends_with("..."));
        assert_eq!(AstNode::var("x").to_formula_short(10), "x");
    }
}
