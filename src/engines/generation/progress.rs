use super::evolution_engine::ProgressCallback;

/// Ignores every event
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best_loss: f64, _tracked: usize) {}
    fn on_individual_evaluated(&mut self, _evaluated: usize, _total: usize) {}
}

/// Reports progress through the `log` facade
pub struct LoggingProgressCallback;

impl ProgressCallback for LoggingProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting", generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_loss: f64, tracked: usize) {
        log::info!(
            "Generation {} complete. Best loss: {:.6}, tracked: {}",
            generation, best_loss, tracked
        );
    }

    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize) {
        if evaluated % 100 == 0 || evaluated == total {
            log::trace!("  Evaluated {}/{} individuals", evaluated, total);
        }
    }
}

// For forwarding progress to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, best_loss: f64, tracked: usize },
    IndividualEvaluated { current: usize, total: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, generation: usize, best_loss: f64, tracked: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_loss,
            tracked,
        });
    }

    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize) {
        let _ = self.sender.send(ProgressMessage::IndividualEvaluated {
            current: evaluated,
            total,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::evolution_engine::GeneticProgram;
    use crate::grammar::{Grammar, RuleNode};
    use crate::types::AstNode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::mpsc;

    #[test]
    fn test_channel_callback_streams_every_generation() {
        let grammar = Grammar::builder()
            .leaf("Real", AstNode::var("x"))
            .call("Real", "Add", &["Real", "Real"])
            .build();
        let program = GeneticProgram::new(4, 2, 3, 0.0, 1.0, 1.0);
        let (sender, receiver) = mpsc::channel();
        let mut callback = ChannelProgressCallback::new(sender);

        program
            .run(
                &grammar,
                "Real",
                |tree: &RuleNode, _: &Grammar| Ok(tree.size() as f64),
                &mut StdRng::seed_from_u64(4),
                &mut callback,
            )
            .unwrap();
        drop(callback);

        let messages: Vec<_> = receiver.iter().collect();
        let milestones: Vec<_> = messages
            .iter()
            .filter_map(|m| match m {
                ProgressMessage::GenerationStart(g) => Some((*g, "start")),
                ProgressMessage::GenerationComplete { generation, tracked, .. } => {
                    assert_eq!(*tracked, 0);
                    Some((*generation, "complete"))
                }
                ProgressMessage::IndividualEvaluated { .. } => None,
            })
            .collect();
        assert_eq!(
            milestones,
            vec![(0, "start"), (0, "complete"), (1, "start"), (1, "complete"), (2, "start"), (2, "complete")]
        );

        let evaluated = messages
            .iter()
            .filter(|m| matches!(m, ProgressMessage::IndividualEvaluated { total: 4, .. }))
            .count();
        assert_eq!(evaluated, 12);
        // generation 0: start, four evaluations, then completion
        assert_eq!(messages[0], ProgressMessage::GenerationStart(0));
        assert_eq!(messages[4], ProgressMessage::IndividualEvaluated { current: 4, total: 4 });
        assert!(matches!(messages[5], ProgressMessage::GenerationComplete { generation: 0, .. }));
    }
}
