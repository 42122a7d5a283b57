use crate::engines::evaluation::{Individual, Population, ScoredTree};
use crate::engines::generation::{
    generator::TreeGenerator,
    initialization::{InitializationStrategy, RandomInit},
    operators::{crossover, mutate, GeneticOperator, OperatorSampler, OperatorWeights},
    selection::{SelectionStrategy, TournamentSelection},
    tracking::{AuxOutput, NoTracking, Tracker, TrackingStrategy},
};
use crate::error::{GpError, Result};
use crate::grammar::{DepthTable, Grammar, RuleNode};
use crate::types::AstNode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Immutable parameters of a genetic-programming run
pub struct GeneticProgram {
    pop_size: usize,
    iterations: usize,
    max_depth: usize,
    weights: OperatorWeights,
    init: Box<dyn InitializationStrategy>,
    selection: Box<dyn SelectionStrategy>,
    tracking: Box<dyn TrackingStrategy>,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_loss: f64, tracked: usize);
    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizeOptions {
    /// Fixed seed for a reproducible run; entropy when `None`
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub tree: RuleNode,
    pub loss: f64,
    pub expr: AstNode,
    pub aux: HashMap<String, AuxOutput>,
}

impl OptimizationResult {
    pub fn ranked(&self, key: &str) -> Option<&[ScoredTree]> {
        match self.aux.get(key) {
            Some(AuxOutput::Ranked(trees)) => Some(trees.as_slice()),
            None => None,
        }
    }
}

/// Mutable per-run state, kept apart from the configuration
struct RunState {
    best: Option<ScoredTree>,
    tracker: Box<dyn Tracker>,
}

impl GeneticProgram {
    /// Uniform random initialization, tournament selection with k = 2 and
    /// no tracking unless overridden with the `with_*` methods
    pub fn new(
        pop_size: usize,
        iterations: usize,
        max_depth: usize,
        p_reproduction: f64,
        p_crossover: f64,
        p_mutation: f64,
    ) -> Self {
        Self {
            pop_size,
            iterations,
            max_depth,
            weights: OperatorWeights::new(p_reproduction, p_crossover, p_mutation),
            init: Box::new(RandomInit),
            selection: Box::new(TournamentSelection::default()),
            tracking: Box::new(NoTracking),
        }
    }

    pub fn with_init<I: InitializationStrategy + 'static>(mut self, init: I) -> Self {
        self.init = Box::new(init);
        self
    }

    pub fn with_selection<S: SelectionStrategy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    pub fn with_tracking<T: TrackingStrategy + 'static>(mut self, tracking: T) -> Self {
        self.tracking = Box::new(tracking);
        self
    }

    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn weights(&self) -> &OperatorWeights {
        &self.weights
    }

    /// Run with a caller-owned random source.
    ///
    /// Every stochastic decision draws from `rng` in a fixed order, so the
    /// same seed and configuration reproduce the same run.
    pub fn run<F, R, C>(
        &self,
        grammar: &Grammar,
        start_type: &str,
        mut loss: F,
        rng: &mut R,
        callback: &mut C,
    ) -> Result<OptimizationResult>
    where
        F: FnMut(&RuleNode, &Grammar) -> anyhow::Result<f64>,
        R: Rng,
        C: ProgressCallback,
    {
        let sampler = self.prepare(grammar, start_type)?;
        let depths = DepthTable::compute(grammar);
        let generator = TreeGenerator::new(grammar, &depths);

        log::info!(
            "Starting genetic program: pop_size={}, iterations={}, max_depth={}, init={}, selection={}, tracking={}",
            self.pop_size,
            self.iterations,
            self.max_depth,
            self.init.name(),
            self.selection.name(),
            self.tracking.name()
        );

        let mut state = RunState {
            best: None,
            tracker: self.tracking.tracker(),
        };

        callback.on_generation_start(0);
        let mut current = Population::with_capacity(self.pop_size);
        for tree in self
            .init
            .initialize(&generator, start_type, self.pop_size, self.max_depth, rng)?
        {
            current.push(Individual::unscored(tree));
        }
        self.evaluate_generation(0, &mut current, grammar, &mut loss, &mut state, callback)?;

        let mut next = Population::with_capacity(self.pop_size);
        for generation in 1..=self.iterations {
            callback.on_generation_start(generation);
            self.breed(&current, &mut next, &generator, &sampler, rng);
            std::mem::swap(&mut current, &mut next);
            self.evaluate_generation(generation, &mut current, grammar, &mut loss, &mut state, callback)?;
        }

        let RunState { best, tracker } = state;
        let best = best.ok_or_else(|| GpError::Configuration("Population produced no scored individual".to_string()))?;
        let expr = grammar.to_expr(&best.tree)?;
        let mut aux = HashMap::new();
        tracker.export(&mut aux);

        log::info!("Genetic program finished. Best loss: {} for {}", best.loss, expr.to_formula_short(80));

        Ok(OptimizationResult {
            tree: best.tree,
            loss: best.loss,
            expr,
            aux,
        })
    }

    fn prepare(&self, grammar: &Grammar, start_type: &str) -> Result<OperatorSampler> {
        if self.pop_size == 0 {
            return Err(GpError::Configuration("Population size must be positive".to_string()));
        }
        if self.selection.min_population() > self.pop_size {
            return Err(GpError::Configuration(format!(
                "{} selection needs at least {} individuals, population size is {}",
                self.selection.name(),
                self.selection.min_population(),
                self.pop_size
            )));
        }
        if !grammar.has_type(start_type) {
            return Err(GpError::UnknownType(start_type.to_string()));
        }
        OperatorSampler::new(&self.weights)
    }

    /// Fill `next` with exactly `pop_size` children of the sorted `current`
    fn breed<R: Rng>(
        &self,
        current: &Population,
        next: &mut Population,
        generator: &TreeGenerator<'_>,
        sampler: &OperatorSampler,
        rng: &mut R,
    ) {
        next.clear();
        let parents = current.individuals();

        while next.len() < self.pop_size {
            let child = match sampler.sample(rng) {
                GeneticOperator::Reproduction => {
                    // the copy keeps its parent's loss; it is not re-scored
                    let (parent, _) = self.selection.select(parents, rng);
                    parent.clone()
                }
                GeneticOperator::Crossover => {
                    let (a, _) = self.selection.select(parents, rng);
                    let (b, _) = self.selection.select(parents, rng);
                    Individual::unscored(crossover(&a.tree, &b.tree, generator.grammar(), self.max_depth, rng))
                }
                GeneticOperator::Mutation => {
                    let (a, _) = self.selection.select(parents, rng);
                    Individual::unscored(mutate(&a.tree, generator, self.max_depth, rng))
                }
            };
            next.push(child);
        }
    }

    fn evaluate_generation<F, C>(
        &self,
        generation: usize,
        population: &mut Population,
        grammar: &Grammar,
        loss: &mut F,
        state: &mut RunState,
        callback: &mut C,
    ) -> Result<()>
    where
        F: FnMut(&RuleNode, &Grammar) -> anyhow::Result<f64>,
        C: ProgressCallback,
    {
        let calls = population.evaluate(grammar, loss, |done, total| {
            callback.on_individual_evaluated(done, total)
        })?;
        population.sort();

        if population.update_best(&mut state.best) {
            log::debug!("Generation {}: new best loss {:?}", generation, state.best.as_ref().map(|b| b.loss));
        }
        state.tracker.observe(population.individuals());

        let best_loss = state.best.as_ref().map_or(f64::INFINITY, |b| b.loss);
        log::debug!(
            "Generation {}: {} loss evaluations, leader {:?}, best {}",
            generation,
            calls,
            population.leader().and_then(|l| l.loss),
            best_loss
        );
        callback.on_generation_complete(generation, best_loss, state.tracker.len());
        Ok(())
    }
}

/// Run `program` with a fresh random source seeded from `options`
pub fn optimize<F>(
    program: &GeneticProgram,
    grammar: &Grammar,
    start_type: &str,
    loss: F,
    options: &OptimizeOptions,
) -> Result<OptimizationResult>
where
    F: FnMut(&RuleNode, &Grammar) -> anyhow::Result<f64>,
{
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    program.run(grammar, start_type, loss, &mut rng, &mut super::progress::NoProgress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::selection::TruncationSelection;
    use crate::engines::generation::tracking::TopKTracking;
    use crate::types::AstNode;

    fn grammar() -> Grammar {
        Grammar::builder()
            .leaf("Real", AstNode::var("x")) // 0
            .leaf("Real", AstNode::float(1.0)) // 1
            .call("Real", "Add", &["Real", "Real"]) // 2
            .call("Real", "Mul", &["Real", "Real"]) // 3
            .build()
    }

    /// Loss: node count, so smaller trees are better
    fn size_loss(tree: &RuleNode, _: &Grammar) -> anyhow::Result<f64> {
        Ok(tree.size() as f64)
    }

    #[derive(Default)]
    struct Recorder {
        best: Vec<f64>,
        tracked: Vec<usize>,
    }

    impl ProgressCallback for Recorder {
        fn on_generation_start(&mut self, _generation: usize) {}
        fn on_generation_complete(&mut self, _generation: usize, best_loss: f64, tracked: usize) {
            self.best.push(best_loss);
            self.tracked.push(tracked);
        }
        fn on_individual_evaluated(&mut self, _evaluated: usize, _total: usize) {}
    }

    #[test]
    fn test_run_reports_every_generation() {
        let program = GeneticProgram::new(12, 6, 4, 0.2, 0.4, 0.4).with_tracking(TopKTracking::new(3));
        let mut rng = StdRng::seed_from_u64(1);
        let mut recorder = Recorder::default();
        let result = program
            .run(&grammar(), "Real", size_loss, &mut rng, &mut recorder)
            .unwrap();

        assert_eq!(recorder.best.len(), 7);
        assert!(recorder.best.windows(2).all(|w| w[1] <= w[0]));
        assert!(recorder.tracked.iter().all(|&t| t <= 3));
        assert_eq!(result.loss, *recorder.best.last().unwrap());
        assert!(result.tree.depth() <= 4);
        assert_eq!(result.ranked(TopKTracking::AUX_KEY).map(|r| r.len()), Some(3));
    }

    #[test]
    fn test_reproduction_only_never_calls_loss_after_generation_zero() {
        let program = GeneticProgram::new(8, 5, 3, 1.0, 0.0, 0.0);
        let mut calls = 0;
        let loss = |tree: &RuleNode, _: &Grammar| -> anyhow::Result<f64> {
            calls += 1;
            Ok(tree.size() as f64)
        };
        optimize(&program, &grammar(), "Real", loss, &OptimizeOptions { seed: Some(3) }).unwrap();
        assert_eq!(calls, 8);
    }

    #[test]
    fn test_zero_iterations_returns_initial_leader() {
        let program = GeneticProgram::new(5, 0, 2, 0.1, 0.45, 0.45);
        let result = optimize(&program, &grammar(), "Real", size_loss, &OptimizeOptions { seed: Some(9) }).unwrap();
        assert!(result.tree.depth() <= 2);
        assert_eq!(result.loss, result.tree.size() as f64);
        assert!(result.aux.is_empty());
    }

    #[test]
    fn test_configuration_errors() {
        let grammar = grammar();
        let options = OptimizeOptions { seed: Some(0) };

        let empty = GeneticProgram::new(0, 1, 3, 1.0, 1.0, 1.0);
        assert!(matches!(
            optimize(&empty, &grammar, "Real", size_loss, &options),
            Err(GpError::Configuration(_))
        ));

        let oversized = GeneticProgram::new(4, 1, 3, 1.0, 1.0, 1.0).with_selection(TruncationSelection::new(5));
        assert!(matches!(
            optimize(&oversized, &grammar, "Real", size_loss, &options),
            Err(GpError::Configuration(_))
        ));

        let no_weights = GeneticProgram::new(4, 1, 3, 0.0, 0.0, 0.0);
        assert!(matches!(
            optimize(&no_weights, &grammar, "Real", size_loss, &options),
            Err(GpError::Configuration(_))
        ));

        let program = GeneticProgram::new(4, 1, 3, 1.0, 1.0, 1.0);
        assert!(matches!(
            optimize(&program, &grammar, "Bool", size_loss, &options),
            Err(GpError::UnknownType(_))
        ));
    }

    #[test]
    fn test_loss_error_aborts_run() {
        let program = GeneticProgram::new(4, 3, 3, 0.0, 1.0, 1.0);
        let loss = |_: &RuleNode, _: &Grammar| -> anyhow::Result<f64> { anyhow::bail!("boom") };
        let err = optimize(&program, &grammar(), "Real", loss, &OptimizeOptions::default()).unwrap_err();
        assert!(matches!(err, GpError::Loss(_)));
    }
}
