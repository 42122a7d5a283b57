pub mod evolution_engine;
pub mod generator;
pub mod hall_of_fame;
pub mod initialization;
pub mod operators;
pub mod progress;
pub mod selection;
pub mod tracking;

pub use evolution_engine::{optimize, GeneticProgram, OptimizationResult, OptimizeOptions, ProgressCallback};
pub use generator::TreeGenerator;
pub use hall_of_fame::{AddOutcome, HallOfFame, RankOrder};
pub use initialization::{InitializationStrategy, RandomInit};
pub use operators::{crossover, mutate, GeneticOperator, OperatorSampler, OperatorWeights};
pub use progress::{ChannelProgressCallback, LoggingProgressCallback, NoProgress, ProgressMessage};
pub use selection::{SelectionStrategy, TournamentSelection, TruncationSelection};
pub use tracking::{AuxOutput, NoTracking, TopKTracking, Tracker, TrackingStrategy};
