use crate::error::{GpError, Result};
use crate::grammar::tree::RuleNode;
use crate::types::AstNode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Right-hand side of a production rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Production {
    /// Terminal: a constant or variable with no children
    Leaf { expr: AstNode },
    /// Function call whose arguments are subtrees of the listed types
    Call { function: String, args: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub return_type: String,
    #[serde(flatten)]
    pub production: Production,
}

impl Rule {
    pub fn child_types(&self) -> &[String] {
        match &self.production {
            Production::Leaf { .. } => &[],
            Production::Call { args, .. } => args,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.child_types().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GrammarDef {
    rules: Vec<Rule>,
}

/// Typed grammar: rules are addressed by their position (rule id)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GrammarDef", into = "GrammarDef")]
pub struct Grammar {
    rules: Vec<Rule>,
    by_type: HashMap<String, Vec<usize>>,
}

impl From<GrammarDef> for Grammar {
    fn from(def: GrammarDef) -> Self {
        Grammar::new(def.rules)
    }
}

impl From<Grammar> for GrammarDef {
    fn from(grammar: Grammar) -> Self {
        GrammarDef {
            rules: grammar.rules,
        }
    }
}

impl Grammar {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut by_type: HashMap<String, Vec<usize>> = HashMap::new();
        for (id, rule) in rules.iter().enumerate() {
            by_type.entry(rule.return_type.clone()).or_default().push(id);
        }
        Self { rules, by_type }
    }

    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, id: usize) -> Result<&Rule> {
        self.rules.get(id).ok_or(GpError::UnknownRule(id))
    }

    /// Return type of rule `id`.
    ///
    /// Panics if `id` is not a rule of this grammar; trees built through
    /// this grammar only carry valid ids.
    pub fn return_type(&self, id: usize) -> &str {
        &self.rules[id].return_type
    }

    pub fn child_types(&self, id: usize) -> &[String] {
        self.rules[id].child_types()
    }

    /// Rule ids producing `ty`, in declaration order
    pub fn rules_for(&self, ty: &str) -> &[usize] {
        self.by_type.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_type(&self, ty: &str) -> bool {
        self.by_type.contains_key(ty)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    /// Convert a derivation tree into its executable expression
    pub fn to_expr(&self, tree: &RuleNode) -> Result<AstNode> {
        let rule = self.rule(tree.rule)?;
        match &rule.production {
            Production::Leaf { expr } => Ok(expr.clone()),
            Production::Call { function, args } => {
                if args.len() != tree.children.len() {
                    return Err(GpError::Evaluation(format!(
                        "rule {} ({}) expects {} children, found {}",
                        tree.rule,
                        function,
                        args.len(),
                        tree.children.len()
                    )));
                }
                let args = tree
                    .children
                    .iter()
                    .map(|child| self.to_expr(child))
                    .collect::<Result<Vec<_>>>()?;
                Ok(AstNode::Call {
                    function: function.clone(),
                    args,
                })
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
}

impl GrammarBuilder {
    pub fn leaf(mut self, return_type: &str, expr: AstNode) -> Self {
        self.rules.push(Rule {
            return_type: return_type.to_string(),
            production: Production::Leaf { expr },
        });
        self
    }

    pub fn call(mut self, return_type: &str, function: &str, args: &[&str]) -> Self {
        self.rules.push(Rule {
            return_type: return_type.to_string(),
            production: Production::Call {
                function: function.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
        });
        self
    }

    pub fn build(self) -> Grammar {
        Grammar::new(self.rules)
    }
}
