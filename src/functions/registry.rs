use crate::functions::{
    primitives::{
        Add, And, Cos, Div, Exp, GreaterThan, IfElse, LessThan, Log, Mul, Neg, Not, Or, Sin, Sub,
    },
    traits::Primitive,
};
use crate::types::DataType;
use std::{collections::HashMap, sync::Arc};

pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Primitive>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };
        registry.register_arithmetic();
        registry.register_logic();
        registry
    }

    /// Registry with no functions; populate with [`FunctionRegistry::register`]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn register(&mut self, primitive: Arc<dyn Primitive>) {
        self.functions
            .insert(primitive.alias().to_string(), primitive);
    }

    pub fn get_primitive(&self, name: &str) -> Option<Arc<dyn Primitive>> {
        self.functions.get(name).cloned()
    }

    pub fn get_by_output_type(&self, data_type: DataType) -> Vec<Arc<dyn Primitive>> {
        self.functions
            .values()
            .filter(|f| f.output_type() == data_type)
            .cloned()
            .collect()
    }

    fn register_arithmetic(&mut self) {
        let primitives: Vec<Arc<dyn Primitive>> = vec![
            Arc::new(Add),
            Arc::new(Sub),
            Arc::new(Mul),
            Arc::new(Div),
            Arc::new(Neg),
            Arc::new(Sin),
            Arc::new(Cos),
            Arc::new(Exp),
            Arc::new(Log),
        ];
        for primitive in primitives {
            self.register(primitive);
        }
    }

    fn register_logic(&mut self) {
        let primitives: Vec<Arc<dyn Primitive>> = vec![
            Arc::new(GreaterThan),
            Arc::new(LessThan),
            Arc::new(And),
            Arc::new(Or),
            Arc::new(Not),
            Arc::new(IfElse),
        ];
        for primitive in primitives {
            self.register(primitive);
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
