use crate::error::{GpError, Result};
use crate::grammar::{Grammar, RuleNode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A population slot: a tree and its loss, `None` until scored
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub tree: RuleNode,
    pub loss: Option<f64>,
}

impl Individual {
    pub fn unscored(tree: RuleNode) -> Self {
        Self { tree, loss: None }
    }

    pub fn scored(tree: RuleNode, loss: f64) -> Self {
        Self {
            tree,
            loss: Some(loss),
        }
    }

    /// Ranking of two losses: numbers ascending, then NaN of either sign,
    /// then unscored slots
    fn rank_cmp(a: Option<f64>, b: Option<f64>) -> Ordering {
        fn class(loss: Option<f64>) -> u8 {
            match loss {
                Some(l) if !l.is_nan() => 0,
                Some(_) => 1,
                None => 2,
            }
        }
        match (a, b) {
            (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => x.total_cmp(&y),
            _ => class(a).cmp(&class(b)),
        }
    }
}

/// A tree paired with a known loss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTree {
    pub tree: RuleNode,
    pub loss: f64,
}

/// One generation's individuals.
///
/// After [`Population::evaluate`] and [`Population::sort`] every slot is
/// scored and the slots are ascending by loss.
#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    /// Drop all slots, keeping the allocation for the next generation
    pub fn clear(&mut self) {
        self.individuals.clear();
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn leader(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Score every unscored slot exactly once.
    ///
    /// `on_evaluated(scored_so_far, total)` fires after each loss call.
    /// Returns the number of loss calls made.
    pub fn evaluate<F, P>(&mut self, grammar: &Grammar, loss: &mut F, mut on_evaluated: P) -> Result<usize>
    where
        F: FnMut(&RuleNode, &Grammar) -> anyhow::Result<f64>,
        P: FnMut(usize, usize),
    {
        let pending = self.individuals.iter().filter(|ind| ind.loss.is_none()).count();
        let mut calls = 0;
        for individual in self.individuals.iter_mut().filter(|ind| ind.loss.is_none()) {
            let value = loss(&individual.tree, grammar).map_err(GpError::Loss)?;
            individual.loss = Some(value);
            calls += 1;
            on_evaluated(calls, pending);
        }
        Ok(calls)
    }

    /// Stable ascending sort by loss; NaN of either sign ranks last
    pub fn sort(&mut self) {
        self.individuals
            .sort_by(|a, b| Individual::rank_cmp(a.loss, b.loss));
    }

    pub fn is_sorted(&self) -> bool {
        self.individuals
            .windows(2)
            .all(|w| Individual::rank_cmp(w[0].loss, w[1].loss).is_le())
    }

    /// Replace `best` with the leader when the leader is strictly better.
    ///
    /// `best` starts as `None`, standing for a loss of +infinity; the first
    /// call always adopts the leader. A NaN leader never displaces a numeric
    /// best, and any numeric leader displaces a NaN best.
    pub fn update_best(&self, best: &mut Option<ScoredTree>) -> bool {
        let Some(Individual {
            tree,
            loss: Some(loss),
        }) = self.leader()
        else {
            return false;
        };
        let improved = match best {
            Some(current) => Individual::rank_cmp(Some(*loss), Some(current.loss)).is_lt(),
            None => true,
        };
        if improved {
            *best = Some(ScoredTree {
                tree: tree.clone(),
                loss: *loss,
            });
        }
        improved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AstNode;

    fn grammar() -> Grammar {
        Grammar::builder()
            .leaf("Real", AstNode::var("x"))
            .leaf("Real", AstNode::float(1.0))
            .leaf("Real", AstNode::float(2.0))
            .build()
    }

    fn population(losses: &[Option<f64>]) -> Population {
        let mut pop = Population::with_capacity(losses.len());
        for (i, loss) in losses.iter().enumerate() {
            pop.push(Individual {
                tree: RuleNode::leaf(i % 3),
                loss: *loss,
            });
        }
        pop
    }

    #[test]
    fn test_evaluate_scores_only_unscored() {
        let mut pop = population(&[Some(5.0), None, None]);
        let mut calls = Vec::new();
        let mut loss = |tree: &RuleNode, _: &Grammar| -> anyhow::Result<f64> {
            calls.push(tree.rule);
            Ok(tree.rule as f64 * 10.0)
        };
        let made = pop.evaluate(&grammar(), &mut loss, |_, _| {}).unwrap();

        assert_eq!(made, 2);
        assert_eq!(calls, vec![1, 2]);
        let losses: Vec<_> = pop.individuals().iter().map(|i| i.loss).collect();
        assert_eq!(losses, vec![Some(5.0), Some(10.0), Some(20.0)]);
    }

    #[test]
    fn test_loss_error_propagates() {
        let mut pop = population(&[None, None]);
        let mut loss = |_: &RuleNode, _: &Grammar| -> anyhow::Result<f64> {
            anyhow::bail!("simulator crashed")
        };
        let err = pop.evaluate(&grammar(), &mut loss, |_, _| {}).unwrap_err();
        assert!(matches!(err, GpError::Loss(_)));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut pop = population(&[Some(3.0), Some(1.0), Some(3.0), Some(f64::NAN), Some(1.0)]);
        pop.sort();
        assert!(pop.is_sorted());
        let order: Vec<_> = pop.individuals().iter().map(|i| i.tree.rule).collect();
        // ties keep their original relative order
        assert_eq!(order, vec![1, 1, 0, 2, 0]);
        assert!(pop.individuals()[4].loss.unwrap().is_nan());
    }

    #[test]
    fn test_runtime_nan_sorts_last() {
        // 0/0 computed at runtime carries the sign bit on common targets
        let nan = std::hint::black_box(0.0_f64) / std::hint::black_box(0.0_f64);
        let negative_nan = -f64::NAN;
        let mut pop = population(&[Some(nan), Some(negative_nan), None, Some(f64::INFINITY), Some(2.0)]);
        pop.sort();
        assert!(pop.is_sorted());

        let losses: Vec<_> = pop.individuals().iter().map(|i| i.loss).collect();
        assert_eq!(losses[0], Some(2.0));
        assert_eq!(losses[1], Some(f64::INFINITY));
        assert!(losses[2].is_some_and(f64::is_nan));
        assert!(losses[3].is_some_and(f64::is_nan));
        assert_eq!(losses[4], None);
    }

    #[test]
    fn test_nan_leader_never_replaces_numeric_best() {
        let nan = std::hint::black_box(0.0_f64) / std::hint::black_box(0.0_f64);
        let mut best = Some(ScoredTree {
            tree: RuleNode::leaf(0),
            loss: 0.5,
        });

        let mut pop = population(&[Some(nan)]);
        assert!(!pop.update_best(&mut best));
        assert_eq!(best.as_ref().map(|b| b.loss), Some(0.5));

        // a NaN best adopted from an all-NaN first generation gives way
        let mut nan_best = None;
        assert!(pop.update_best(&mut nan_best));
        pop.clear();
        pop.push(Individual::scored(RuleNode::leaf(1), 7.0));
        assert!(pop.update_best(&mut nan_best));
        assert_eq!(nan_best.map(|b| b.loss), Some(7.0));
    }

    #[test]
    fn test_update_best_requires_strict_improvement() {
        let mut best = None;
        let mut pop = population(&[Some(2.0)]);
        assert!(pop.update_best(&mut best));
        assert_eq!(best.as_ref().map(|b| b.loss), Some(2.0));

        pop.clear();
        pop.push(Individual::scored(RuleNode::leaf(1), 2.0));
        assert!(!pop.update_best(&mut best));
        assert_eq!(best.as_ref().map(|b| b.tree.rule), Some(0));

        pop.clear();
        pop.push(Individual::scored(RuleNode::leaf(2), 1.5));
        assert!(pop.update_best(&mut best));
        assert_eq!(best.map(|b| b.tree.rule), Some(2));
    }
}
