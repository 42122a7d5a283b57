pub mod expression;
pub mod population;
pub mod regression;

pub use expression::{Bindings, ExpressionEvaluator};
pub use population::{Individual, Population, ScoredTree};
pub use regression::RegressionLoss;
