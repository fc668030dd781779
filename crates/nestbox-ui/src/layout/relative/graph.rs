//! Sibling dependency graph for the relative resolver.
//!
//! Each child is a graph node. A rule such as "below #title" makes the
//! anchored child a dependency of the ruled child. Sorting yields an order in
//! which every anchor is visited before the children that reference it.

use indexmap::{IndexMap, IndexSet};
use nestbox_core::collections::map::HashMap;
use nestbox_core::NodeId;
use nestbox_layout::{AnchorId, RelativeVerb, RuleSet};

/// Axis a sort is performed for. Each axis has its own verb subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphAxis {
    Horizontal,
    Vertical,
}

impl GraphAxis {
    /// Verbs whose anchors order children along this axis.
    pub fn verbs(self) -> &'static [RelativeVerb] {
        match self {
            GraphAxis::Horizontal => &RelativeVerb::HORIZONTAL,
            GraphAxis::Vertical => &RelativeVerb::VERTICAL,
        }
    }
}

/// Result of one topological sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOutcome {
    pub sorted: usize,
    pub total: usize,
}

impl SortOutcome {
    /// True when every node made it into the output, i.e. there was no cycle.
    pub fn is_complete(&self) -> bool {
        self.sorted == self.total
    }

    /// Nodes left out because of a cycle.
    pub fn unresolved(&self) -> usize {
        self.total - self.sorted
    }
}

/// Lifecycle of the graph between rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphState {
    #[default]
    Unbuilt,
    Built,
    Sorted,
    CycleDetected,
}

#[derive(Debug)]
struct GraphNode {
    node: NodeId,
    rules: RuleSet,
    dependents: IndexSet<usize>,
    dependencies: IndexMap<AnchorId, usize>,
}

/// Arena of graph nodes, cleared and refilled on every rebuild.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    keyed: HashMap<AnchorId, usize>,
    indices: HashMap<NodeId, usize>,
    roots: Vec<usize>,
    state: GraphState,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every node while keeping the allocations for the next rebuild.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.keyed.clear();
        self.indices.clear();
        self.roots.clear();
        self.state = GraphState::Unbuilt;
    }

    /// Adds a child with its direction-resolved rules.
    ///
    /// A later child with the same key shadows an earlier one.
    pub fn add(&mut self, node: NodeId, key: Option<AnchorId>, rules: RuleSet) {
        let index = self.nodes.len();
        if let Some(key) = key {
            self.keyed.insert(key, index);
        }
        self.indices.insert(node, index);
        self.nodes.push(GraphNode {
            node,
            rules,
            dependents: IndexSet::new(),
            dependencies: IndexMap::new(),
        });
        self.state = GraphState::Built;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.indices.contains_key(&node)
    }

    /// Resolved rules recorded for `node`.
    pub fn rules(&self, node: NodeId) -> Option<&RuleSet> {
        let index = *self.indices.get(&node)?;
        Some(&self.nodes[index].rules)
    }

    /// Child registered under `key`.
    pub fn lookup(&self, key: &AnchorId) -> Option<NodeId> {
        let index = *self.keyed.get(key)?;
        Some(self.nodes[index].node)
    }

    /// Child anchored by `verb` on `node`, if the anchor is a known sibling.
    pub fn related(&self, node: NodeId, verb: RelativeVerb) -> Option<NodeId> {
        let key = self.rules(node)?.sibling_of(verb)?;
        self.lookup(key)
    }

    /// Writes the children in dependency order for `axis` into `sorted`.
    ///
    /// Roots are consumed last-in first-out. When a cycle exists the output
    /// holds only the sortable prefix and the outcome reports the shortfall.
    pub fn sort(&mut self, axis: GraphAxis, sorted: &mut Vec<NodeId>) -> SortOutcome {
        sorted.clear();
        self.find_roots(axis.verbs());

        while let Some(index) = self.roots.pop() {
            sorted.push(self.nodes[index].node);
            let dependents = std::mem::take(&mut self.nodes[index].dependents);
            for &dependent in &dependents {
                let dependencies = &mut self.nodes[dependent].dependencies;
                dependencies.retain(|_, dependency| *dependency != index);
                if dependencies.is_empty() {
                    self.roots.push(dependent);
                }
            }
            self.nodes[index].dependents = dependents;
        }

        let outcome = SortOutcome {
            sorted: sorted.len(),
            total: self.nodes.len(),
        };
        if outcome.is_complete() {
            self.state = GraphState::Sorted;
        } else {
            self.state = GraphState::CycleDetected;
            log::warn!(
                "circular {axis:?} dependencies: {} of {} children could not be ordered",
                outcome.unresolved(),
                outcome.total
            );
        }
        outcome
    }

    /// Rebuilds the edges for `verbs` and collects the nodes without dependencies.
    fn find_roots(&mut self, verbs: &[RelativeVerb]) {
        for node in &mut self.nodes {
            node.dependents.clear();
            node.dependencies.clear();
        }

        for index in 0..self.nodes.len() {
            for &verb in verbs {
                let Some(key) = self.nodes[index].rules.sibling_of(verb) else {
                    continue;
                };
                let Some(&dependency) = self.keyed.get(key) else {
                    continue;
                };
                if dependency == index {
                    continue;
                }
                let key = key.clone();
                self.nodes[dependency].dependents.insert(index);
                self.nodes[index].dependencies.insert(key, dependency);
            }
        }

        self.roots.clear();
        self.roots.extend(
            self.nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| node.dependencies.is_empty())
                .map(|(index, _)| index),
        );
    }
}

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod tests;
