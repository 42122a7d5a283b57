use crate::grammar::rules::Grammar;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Node of a derivation tree: a rule id and one subtree per child type.
///
/// Trees are plain owned values. `clone` is a deep copy, so a child built
/// from a parent never shares structure with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleNode {
    pub rule: usize,
    pub children: Vec<RuleNode>,
}

/// Location of a node as the child-index path from the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeLoc(Vec<usize>);

impl NodeLoc {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// Edge count from the root (root is level 0)
    pub fn level(&self) -> usize {
        self.0.len()
    }

    pub fn path(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodeLoc {
    fn from(path: Vec<usize>) -> Self {
        Self(path)
    }
}

impl RuleNode {
    pub fn leaf(rule: usize) -> Self {
        Self {
            rule,
            children: Vec::new(),
        }
    }

    pub fn new(rule: usize, children: Vec<RuleNode>) -> Self {
        Self { rule, children }
    }

    /// Longest root-to-leaf edge count; a lone leaf has depth 0
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }

    pub fn get(&self, loc: &NodeLoc) -> Option<&RuleNode> {
        let mut node = self;
        for &i in loc.path() {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    pub fn get_mut(&mut self, loc: &NodeLoc) -> Option<&mut RuleNode> {
        let mut node = self;
        for &i in loc.path() {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Replace the subtree at `loc`; returns false if `loc` does not exist
    pub fn replace(&mut self, loc: &NodeLoc, subtree: RuleNode) -> bool {
        match self.get_mut(loc) {
            Some(slot) => {
                *slot = subtree;
                true
            }
            None => false,
        }
    }

    /// All node locations in preorder
    pub fn locations(&self) -> Vec<NodeLoc> {
        let mut out = Vec::with_capacity(self.size());
        self.collect(&NodeLoc::root(), &mut |_, loc| out.push(loc.clone()));
        out
    }

    /// Locations whose rule returns `ty` at a level below `levels`
    pub fn locations_of_type(&self, grammar: &Grammar, ty: &str, levels: usize) -> Vec<NodeLoc> {
        let mut out = Vec::new();
        self.collect(&NodeLoc::root(), &mut |node, loc| {
            if loc.level() < levels && grammar.return_type(node.rule) == ty {
                out.push(loc.clone());
            }
        });
        out
    }

    /// Whether some node of type `ty` sits within `levels` levels of the root
    pub fn contains_return_type(&self, grammar: &Grammar, ty: &str, levels: usize) -> bool {
        if levels == 0 {
            return false;
        }
        if grammar.return_type(self.rule) == ty {
            return true;
        }
        self.children
            .iter()
            .any(|c| c.contains_return_type(grammar, ty, levels - 1))
    }

    /// Uniformly sample any node location
    pub fn sample_location<R: Rng + ?Sized>(&self, rng: &mut R) -> NodeLoc {
        self.locations()
            .choose(rng)
            .cloned()
            .unwrap_or_else(NodeLoc::root)
    }

    /// Uniformly sample a location of type `ty` within `levels` levels
    pub fn sample_location_of_type<R: Rng + ?Sized>(
        &self,
        grammar: &Grammar,
        ty: &str,
        levels: usize,
        rng: &mut R,
    ) -> Option<NodeLoc> {
        self.locations_of_type(grammar, ty, levels).choose(rng).cloned()
    }

    fn collect<F: FnMut(&RuleNode, &NodeLoc)>(&self, loc: &NodeLoc, visit: &mut F) {
        visit(self, loc);
        for (i, child) in self.children.iter().enumerate() {
            child.collect(&loc.child(i), visit);
        }
    }
}
