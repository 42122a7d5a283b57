use crate::engines::generation::generator::TreeGenerator;
use crate::error::Result;
use crate::grammar::RuleNode;
use rand::RngCore;

/// Builds generation 0
pub trait InitializationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn initialize(
        &self,
        generator: &TreeGenerator<'_>,
        start_type: &str,
        pop_size: usize,
        max_depth: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<RuleNode>>;
}

/// Independent uniformly random trees of the start type
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInit;

impl InitializationStrategy for RandomInit {
    fn name(&self) -> &'static str {
        "random"
    }

    fn initialize(
        &self,
        generator: &TreeGenerator<'_>,
        start_type: &str,
        pop_size: usize,
        max_depth: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<RuleNode>> {
        (0..pop_size)
            .map(|_| generator.generate(start_type, max_depth, rng))
            .collect()
    }
}
