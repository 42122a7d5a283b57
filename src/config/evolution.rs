use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::generation::{
    GeneticProgram, OperatorWeights, OptimizeOptions, TopKTracking, TournamentSelection,
    TruncationSelection,
};
use crate::error::GpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub iterations: usize,
    pub max_tree_depth: usize,
    pub operator_weights: OperatorWeights,
    pub selection_method: SelectionMethod,
    pub tracking: TrackingMethod,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SelectionMethod {
    Tournament { k: usize },
    Truncation { k: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TrackingMethod {
    None,
    TopK { k: usize },
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            iterations: 30,
            max_tree_depth: 6,
            operator_weights: OperatorWeights::default(),
            selection_method: SelectionMethod::Tournament { k: 2 },
            tracking: TrackingMethod::None,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Build the run configuration this section describes
    pub fn to_program(&self) -> GeneticProgram {
        let weights = self.operator_weights;
        let program = GeneticProgram::new(
            self.population_size,
            self.iterations,
            self.max_tree_depth,
            weights.reproduction,
            weights.crossover,
            weights.mutation,
        );
        let program = match self.selection_method {
            SelectionMethod::Tournament { k } => program.with_selection(TournamentSelection::new(k)),
            SelectionMethod::Truncation { k } => program.with_selection(TruncationSelection::new(k)),
        };
        match self.tracking {
            TrackingMethod::None => program,
            TrackingMethod::TopK { k } => program.with_tracking(TopKTracking::new(k)),
        }
    }

    pub fn options(&self) -> OptimizeOptions {
        OptimizeOptions { seed: self.seed }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GpError> {
        if self.population_size == 0 {
            return Err(GpError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        let k = match self.selection_method {
            SelectionMethod::Tournament { k } | SelectionMethod::Truncation { k } => k,
        };
        if k == 0 || k > self.population_size {
            return Err(GpError::Configuration(format!(
                "Selection size must be between 1 and the population size ({}), got {}",
                self.population_size, k
            )));
        }
        let w = self.operator_weights;
        let weights = [w.reproduction, w.crossover, w.mutation];
        if weights.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(GpError::Configuration(
                "Operator weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().all(|p| *p == 0.0) {
            return Err(GpError::Configuration(
                "At least one operator weight must be positive".to_string(),
            ));
        }
        if let TrackingMethod::TopK { k: 0 } = self.tracking {
            return Err(GpError::Configuration(
                "Top-k tracking needs k of at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let field = |name: &str, field_type: &str, default: serde_json::Value, min: Option<f64>, description: &str| {
            FieldManifest {
                name: name.to_string(),
                field_type: field_type.to_string(),
                default,
                min,
                max: None,
                description: description.to_string(),
            }
        };
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                field("population_size", "integer", serde_json::json!(self.population_size), Some(1.0), "Individuals per generation"),
                field("iterations", "integer", serde_json::json!(self.iterations), Some(0.0), "Generations bred after the initial one"),
                field("max_tree_depth", "integer", serde_json::json!(self.max_tree_depth), Some(0.0), "Deepest root-to-leaf edge count allowed"),
                field("operator_weights", "object", serde_json::json!(self.operator_weights), Some(0.0), "Relative weights of reproduction, crossover and mutation"),
                field("selection_method", "object", serde_json::json!(self.selection_method), None, "Tournament or truncation selection with size k"),
                field("tracking", "object", serde_json::json!(self.tracking), None, "Optional top-k retention of the best trees"),
                field("seed", "integer", serde_json::json!(self.seed), Some(0.0), "Random seed; omit for a non-reproducible run"),
            ],
        }
    }
}
