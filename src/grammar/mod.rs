//! Typed grammar, derivation trees and the primitive tree operations the
//! genetic program is built on.

pub mod depth;
pub mod rules;
pub mod tree;

pub use depth::DepthTable;
pub use rules::{Grammar, GrammarBuilder, Production, Rule};
pub use tree::{NodeLoc, RuleNode};
