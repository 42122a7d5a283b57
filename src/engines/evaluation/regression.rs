use crate::{
    engines::evaluation::expression::{Bindings, ExpressionEvaluator},
    functions::registry::FunctionRegistry,
    grammar::{Grammar, RuleNode},
    types::Value,
};
use std::sync::Arc;

/// Sum-of-squared-errors loss of a single-variable expression against
/// fixed `(input, target)` samples.
///
/// Expressions that fail to evaluate, or that produce a non-finite error,
/// score `f64::INFINITY` so they sink to the bottom of the population.
pub struct RegressionLoss {
    evaluator: ExpressionEvaluator,
    variable: String,
    samples: Vec<(f64, f64)>,
}

impl RegressionLoss {
    pub fn new(registry: Arc<FunctionRegistry>, variable: &str, samples: Vec<(f64, f64)>) -> Self {
        Self {
            evaluator: ExpressionEvaluator::new(registry),
            variable: variable.to_string(),
            samples,
        }
    }

    /// Sample `target` at each of `inputs`
    pub fn from_target<I, T>(registry: Arc<FunctionRegistry>, variable: &str, inputs: I, target: T) -> Self
    where
        I: IntoIterator<Item = f64>,
        T: Fn(f64) -> f64,
    {
        let samples = inputs.into_iter().map(|x| (x, target(x))).collect();
        Self::new(registry, variable, samples)
    }

    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    pub fn loss(&self, tree: &RuleNode, grammar: &Grammar) -> anyhow::Result<f64> {
        let expr = grammar.to_expr(tree)?;
        let mut bindings = Bindings::with_capacity(1);
        let mut total = 0.0;

        for &(x, target) in &self.samples {
            bindings.insert(self.variable.clone(), Value::Float(x));
            let Ok(y) = self.evaluator.evaluate_float(&expr, &bindings) else {
                return Ok(f64::INFINITY);
            };
            total += (y - target).powi(2);
        }

        if total.is_finite() {
            Ok(total)
        } else {
            Ok(f64::INFINITY)
        }
    }
}
