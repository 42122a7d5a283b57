use crate::grammar::rules::Grammar;
use std::collections::HashMap;

/// Minimum completion depth per type.
///
/// A type is absent when no finite tree of that type exists (every rule
/// for it recurses without a way out).
#[derive(Debug, Clone, Default)]
pub struct DepthTable {
    by_type: HashMap<String, usize>,
}

impl DepthTable {
    /// Fixed-point iteration over the rules until no type improves
    pub fn compute(grammar: &Grammar) -> Self {
        let mut table = Self::default();
        loop {
            let mut changed = false;
            for id in 0..grammar.len() {
                let Some(depth) = table.rule_depth(grammar, id) else {
                    continue;
                };
                let ty = grammar.return_type(id);
                match table.by_type.get(ty) {
                    Some(&known) if known <= depth => {}
                    _ => {
                        table.by_type.insert(ty.to_string(), depth);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        table
    }

    pub fn get(&self, ty: &str) -> Option<usize> {
        self.by_type.get(ty).copied()
    }

    /// Minimum depth of any complete tree rooted at rule `id`
    pub fn rule_depth(&self, grammar: &Grammar, id: usize) -> Option<usize> {
        let children = grammar.child_types(id);
        if children.is_empty() {
            return Some(0);
        }
        children
            .iter()
            .map(|ty| self.get(ty))
            .try_fold(0, |acc, d| d.map(|d| acc.max(d)))
            .map(|d| d + 1)
    }

    pub fn can_complete(&self, ty: &str, max_depth: usize) -> bool {
        self.get(ty).is_some_and(|d| d <= max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AstNode;

    #[test]
    fn test_terminal_and_recursive_types() {
        let grammar = Grammar::builder()
            .call("Real", "Add", &["Real", "Real"])
            .leaf("Real", AstNode::var("x"))
            .call("Bool", "Gt", &["Real", "Real"])
            .call("Real", "If", &["Bool", "Real", "Real"])
            .call("Wrapped", "Not", &["Bool"])
            .build();
        let table = DepthTable::compute(&grammar);

        assert_eq!(table.get("Real"), Some(0));
        assert_eq!(table.get("Bool"), Some(1));
        assert_eq!(table.get("Wrapped"), Some(2));
        assert_eq!(table.rule_depth(&grammar, 3), Some(2));
        assert!(table.can_complete("Wrapped", 2));
        assert!(!table.can_complete("Wrapped", 1));
    }

    #[test]
    fn test_unterminated_type_is_absent() {
        let grammar = Grammar::builder()
            .call("Loop", "Neg", &["Loop"])
            .leaf("Real", AstNode::var("x"))
            .build();
        let table = DepthTable::compute(&grammar);

        assert_eq!(table.get("Loop"), None);
        assert_eq!(table.rule_depth(&grammar, 0), None);
        assert!(!table.can_complete("Loop", 100));
        assert!(!table.can_complete("Unknown", 100));
    }
}
