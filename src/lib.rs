//! Strongly-typed genetic programming over grammar-constrained expression
//! trees.
//!
//! A [`Grammar`] declares typed production rules. [`GeneticProgram`] evolves
//! a population of derivation trees of a start type towards a lower loss
//! with reproduction, subtree crossover and subtree mutation, never letting
//! a tree grow past the configured depth.
//!
//! ```
//! use std::sync::Arc;
//! use typegp::{optimize, AstNode, FunctionRegistry, GeneticProgram, Grammar, OptimizeOptions, RegressionLoss};
//!
//! let grammar = Grammar::builder()
//!     .leaf("Real", AstNode::var("x"))
//!     .leaf("Real", AstNode::float(1.0))
//!     .call("Real", "Add", &["Real", "Real"])
//!     .call("Real", "Mul", &["Real", "Real"])
//!     .build();
//! let target = RegressionLoss::from_target(
//!     Arc::new(FunctionRegistry::new()),
//!     "x",
//!     (-3..=3).map(f64::from),
//!     |x| x * x + 1.0,
//! );
//!
//! let program = GeneticProgram::new(20, 5, 4, 0.1, 0.45, 0.45);
//! let result = optimize(
//!     &program,
//!     &grammar,
//!     "Real",
//!     |tree, grammar| target.loss(tree, grammar),
//!     &OptimizeOptions { seed: Some(1) },
//! )
//! .unwrap();
//! assert!(result.tree.depth() <= 4);
//! ```

pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod grammar;
pub mod types;

pub use engines::evaluation::{ExpressionEvaluator, Individual, RegressionLoss, ScoredTree};
pub use engines::generation::{
    optimize, GeneticProgram, OptimizationResult, OptimizeOptions, ProgressCallback, TopKTracking,
    TournamentSelection, TruncationSelection,
};
pub use error::{GpError, Result};
pub use functions::FunctionRegistry;
pub use grammar::{DepthTable, Grammar, NodeLoc, RuleNode};
pub use types::{AstNode, Value};
