use crate::engines::generation::generator::TreeGenerator;
use crate::error::{GpError, Result};
use crate::grammar::{Grammar, RuleNode};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneticOperator {
    Reproduction,
    Crossover,
    Mutation,
}

/// Relative operator weights; they need not sum to one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorWeights {
    pub reproduction: f64,
    pub crossover: f64,
    pub mutation: f64,
}

impl OperatorWeights {
    pub fn new(reproduction: f64, crossover: f64, mutation: f64) -> Self {
        Self {
            reproduction,
            crossover,
            mutation,
        }
    }
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self::new(0.1, 0.45, 0.45)
    }
}

/// Categorical draw over the three operators
#[derive(Debug, Clone)]
pub struct OperatorSampler {
    dist: WeightedIndex<f64>,
}

impl OperatorSampler {
    const OPERATORS: [GeneticOperator; 3] = [
        GeneticOperator::Reproduction,
        GeneticOperator::Crossover,
        GeneticOperator::Mutation,
    ];

    /// Fails when the weights are negative, non-finite or all zero
    pub fn new(weights: &OperatorWeights) -> Result<Self> {
        let raw = [weights.reproduction, weights.crossover, weights.mutation];
        if raw.iter().any(|w| !w.is_finite()) {
            return Err(GpError::Configuration(format!(
                "Operator weights must be finite: {:?}",
                weights
            )));
        }
        let dist = WeightedIndex::new(raw)
            .map_err(|e| GpError::Configuration(format!("Invalid operator weights {:?}: {}", weights, e)))?;
        Ok(Self { dist })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneticOperator {
        Self::OPERATORS[self.dist.sample(rng)]
    }
}

/// Subtree crossover.
///
/// A uniformly chosen subtree of `b` replaces a same-typed subtree of a copy
/// of `a`, at a level low enough that the child stays within `max_depth`.
/// When no such site exists the copy of `a` comes back unchanged.
pub fn crossover<R: Rng + ?Sized>(
    a: &RuleNode,
    b: &RuleNode,
    grammar: &Grammar,
    max_depth: usize,
    rng: &mut R,
) -> RuleNode {
    let mut child = a.clone();

    let donor_loc = b.sample_location(rng);
    let Some(donor) = b.get(&donor_loc) else {
        return child;
    };
    let ty = grammar.return_type(donor.rule);

    // levels available for the insertion site: max_depth + 1 - height(donor)
    let Some(levels) = (max_depth + 1).checked_sub(donor.depth()) else {
        return child;
    };
    if levels == 0 || !child.contains_return_type(grammar, ty, levels) {
        return child;
    }

    if let Some(site) = child.sample_location_of_type(grammar, ty, levels, rng) {
        child.replace(&site, donor.clone());
    }
    child
}

/// Subtree mutation.
///
/// A uniformly chosen node of a copy of `a` is regrown at random with the
/// same type, bounded so the child stays within `max_depth`. Falls back to
/// the unchanged copy when the node sits below the depth limit or its type
/// cannot be completed in the remaining budget.
pub fn mutate<R: Rng + ?Sized>(
    a: &RuleNode,
    generator: &TreeGenerator<'_>,
    max_depth: usize,
    rng: &mut R,
) -> RuleNode {
    let mut child = a.clone();

    let site = child.sample_location(rng);
    let Some(node) = child.get(&site) else {
        return child;
    };
    let ty = generator.grammar().return_type(node.rule).to_string();

    // levels available below the site: max_depth + 1 - level(site)
    let Some(levels) = (max_depth + 1).checked_sub(site.level()) else {
        return child;
    };
    if levels == 0 || !generator.depths().can_complete(&ty, levels - 1) {
        return child;
    }

    if let Ok(subtree) = generator.generate(&ty, levels - 1, rng) {
        child.replace(&site, subtree);
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::DepthTable;
    use crate::types::AstNode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grammar() -> Grammar {
        Grammar::builder()
            .leaf("Real", AstNode::var("x")) // 0
            .leaf("Real", AstNode::float(1.0)) // 1
            .call("Real", "Add", &["Real", "Real"]) // 2
            .call("Real", "If", &["Bool", "Real", "Real"]) // 3
            .call("Bool", "Gt", &["Real", "Real"]) // 4
            .build()
    }

    fn chain(depth: usize) -> RuleNode {
        (0..depth).fold(RuleNode::leaf(0), |acc, _| RuleNode::new(2, vec![acc, RuleNode::leaf(1)]))
    }

    #[test]
    fn test_sampler_honours_zero_weights() {
        let mut rng = StdRng::seed_from_u64(2);
        for (weights, expected) in [
            (OperatorWeights::new(1.0, 0.0, 0.0), GeneticOperator::Reproduction),
            (OperatorWeights::new(0.0, 1.0, 0.0), GeneticOperator::Crossover),
            (OperatorWeights::new(0.0, 0.0, 1.0), GeneticOperator::Mutation),
        ] {
            let sampler = OperatorSampler::new(&weights).unwrap();
            assert!((0..200).all(|_| sampler.sample(&mut rng) == expected));
        }
    }

    #[test]
    fn test_sampler_uses_relative_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let sampler = OperatorSampler::new(&OperatorWeights::new(3.0, 1.0, 0.0)).unwrap();
        let reproductions = (0..4000)
            .filter(|_| sampler.sample(&mut rng) == GeneticOperator::Reproduction)
            .count();
        assert!((2800..3200).contains(&reproductions));
    }

    #[test]
    fn test_sampler_rejects_degenerate_weights() {
        assert!(OperatorSampler::new(&OperatorWeights::new(0.0, 0.0, 0.0)).is_err());
        assert!(OperatorSampler::new(&OperatorWeights::new(-1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_crossover_respects_depth_and_leaves_parents() {
        let grammar = grammar();
        let mut rng = StdRng::seed_from_u64(10);
        let a = chain(3);
        let b = chain(4);
        for _ in 0..100 {
            let child = crossover(&a, &b, &grammar, 4, &mut rng);
            assert!(child.depth() <= 4);
            assert_eq!(grammar.return_type(child.rule), "Real");
        }
        assert_eq!(a, chain(3));
        assert_eq!(b, chain(4));
    }

    #[test]
    fn test_crossover_without_compatible_site_is_noop() {
        let grammar = grammar();
        let mut rng = StdRng::seed_from_u64(10);
        // donor is a Bool-only tree; the recipient has no Bool node
        let a = chain(2);
        let b = RuleNode::new(4, vec![RuleNode::leaf(0), RuleNode::leaf(0)]);
        let mut changed = 0;
        for _ in 0..50 {
            let child = crossover(&a, &b, &grammar, 5, &mut rng);
            if child != a {
                changed += 1;
                assert!(child.depth() <= 5);
            }
        }
        // Real leaves of the donor can still land; Bool roots never can
        assert!(changed > 0);

        let only_bool = RuleNode::new(4, vec![RuleNode::leaf(0), RuleNode::leaf(0)]);
        let leaf = RuleNode::leaf(0);
        // donor too tall for a depth-0 limit except at its leaves
        for _ in 0..50 {
            let child = crossover(&leaf, &only_bool, &grammar, 0, &mut rng);
            assert!(child.depth() == 0);
        }
    }

    #[test]
    fn test_mutation_respects_depth() {
        let grammar = grammar();
        let depths = DepthTable::compute(&grammar);
        let generator = TreeGenerator::new(&grammar, &depths);
        let mut rng = StdRng::seed_from_u64(21);
        let a = chain(3);
        let mut changed = false;
        for _ in 0..100 {
            let child = mutate(&a, &generator, 5, &mut rng);
            assert!(child.depth() <= 5);
            assert_eq!(grammar.return_type(child.rule), "Real");
            changed |= child != a;
        }
        assert!(changed);
        assert_eq!(a, chain(3));
    }

    #[test]
    fn test_mutation_at_exhausted_budget_keeps_tree_legal() {
        let grammar = grammar();
        let depths = DepthTable::compute(&grammar);
        let generator = TreeGenerator::new(&grammar, &depths);
        let mut rng = StdRng::seed_from_u64(13);
        // tree already at the limit: only same-height replacements fit
        let a = chain(2);
        for _ in 0..100 {
            let child = mutate(&a, &generator, 2, &mut rng);
            assert!(child.depth() <= 2);
        }
    }
}
