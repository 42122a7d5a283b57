use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use typegp::config::{ConfigManager, EvolutionConfig, GrammarConfig};
use typegp::engines::generation::{LoggingProgressCallback, TopKTracking};
use typegp::{AstNode, FunctionRegistry, GeneticProgram, Grammar, RegressionLoss};

/// Symbolic regression of `x^2 + x` on [-5, 5].
///
/// Usage: `typegp [config.toml]`. Without a grammar section the search uses
/// a small arithmetic grammar over `x` with start type `Real`.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    let config_path = std::env::args().nth(1);
    if let Some(path) = &config_path {
        manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?;
        log::info!("Loaded configuration from {}", path);
    }
    let config = manager.get();

    let (grammar, start_type) = match &config.grammar {
        Some(section) => (GrammarConfig::grammar(section), section.start_type.clone()),
        None => (default_grammar(), "Real".to_string()),
    };

    let target = RegressionLoss::from_target(
        Arc::new(FunctionRegistry::new()),
        "x",
        (-10..=10).map(|i| f64::from(i) * 0.5),
        |x| x * x + x,
    );

    let program = demo_program(&config.evolution, config_path.is_some());
    let mut rng = match config.evolution.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let result = program.run(
        &grammar,
        &start_type,
        |tree, grammar| target.loss(tree, grammar),
        &mut rng,
        &mut LoggingProgressCallback,
    )?;

    println!("Best loss: {:.6}", result.loss);
    println!("Best expression: {}", result.expr);
    if let Some(ranked) = result.ranked(TopKTracking::AUX_KEY) {
        println!("Top {}:", ranked.len());
        for (rank, entry) in ranked.iter().enumerate() {
            let expr = grammar.to_expr(&entry.tree)?;
            println!("  {}. {:.6}  {}", rank + 1, entry.loss, expr.to_formula_short(60));
        }
    }
    Ok(())
}

fn default_grammar() -> Grammar {
    Grammar::builder()
        .leaf("Real", AstNode::var("x"))
        .leaf("Real", AstNode::float(1.0))
        .leaf("Real", AstNode::float(2.0))
        .call("Real", "Add", &["Real", "Real"])
        .call("Real", "Sub", &["Real", "Real"])
        .call("Real", "Mul", &["Real", "Real"])
        .build()
}

/// A config file decides tracking itself; the bare demo keeps a top 5
fn demo_program(evolution: &EvolutionConfig, from_file: bool) -> GeneticProgram {
    let program = evolution.to_program();
    if from_file {
        program
    } else {
        program.with_tracking(TopKTracking::new(5))
    }
}
