use crate::error::{GpError, Result};
use crate::grammar::{DepthTable, Grammar, RuleNode};
use rand::seq::SliceRandom;
use rand::Rng;

/// Random, depth-bounded tree construction for a grammar
pub struct TreeGenerator<'a> {
    grammar: &'a Grammar,
    depths: &'a DepthTable,
}

impl<'a> TreeGenerator<'a> {
    pub fn new(grammar: &'a Grammar, depths: &'a DepthTable) -> Self {
        Self { grammar, depths }
    }

    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub fn depths(&self) -> &'a DepthTable {
        self.depths
    }

    /// Build a random tree of type `ty` with depth at most `max_depth`.
    ///
    /// At every node only rules that can still be completed within the
    /// remaining budget are eligible, so generation always terminates.
    pub fn generate<R: Rng + ?Sized>(&self, ty: &str, max_depth: usize, rng: &mut R) -> Result<RuleNode> {
        if !self.grammar.has_type(ty) {
            return Err(GpError::UnknownType(ty.to_string()));
        }

        let eligible: Vec<usize> = self
            .grammar
            .rules_for(ty)
            .iter()
            .copied()
            .filter(|&id| {
                self.depths
                    .rule_depth(self.grammar, id)
                    .is_some_and(|d| d <= max_depth)
            })
            .collect();

        let rule = *eligible.choose(rng).ok_or_else(|| GpError::DepthBudget {
            ty: ty.to_string(),
            max_depth,
        })?;

        // an eligible rule with children has depth >= 1, so max_depth >= 1 here
        let children = self
            .grammar
            .child_types(rule)
            .iter()
            .map(|child_ty| self.generate(child_ty, max_depth - 1, rng))
            .collect::<Result<Vec<_>>>()?;

        Ok(RuleNode::new(rule, children))
    }
}
