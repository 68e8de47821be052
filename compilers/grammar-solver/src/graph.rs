use petgraph::algo::tarjan_scc;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use grammar_protocol::{ClauseId, ClauseSet};
use std::collections::HashMap;

/// `expandsTo` links between the clauses of one sentence.
///
/// Nodes are clause ids; an edge runs from the clause holding the element
/// to the clause it expands to, weighted by that element's index. Links to
/// unknown clauses are left out.
pub struct ClauseGraph {
    graph: Graph<ClauseId, usize, Directed>,
    index_map: HashMap<ClauseId, NodeIndex>,
}

impl ClauseGraph {
    pub fn build(clauses: &ClauseSet) -> Self {
        let mut graph = Graph::new();
        let mut index_map = HashMap::new();
        for clause in clauses.iter() {
            let idx = graph.add_node(clause.id.clone());
            index_map.insert(clause.id.clone(), idx);
        }

        for clause in clauses.iter() {
            let Some(&from) = index_map.get(&clause.id) else { continue };
            for (i, element) in clause.elements.iter().enumerate() {
                let Some(target) = element.expands_to.as_ref() else { continue };
                if let Some(&to) = index_map.get(target) {
                    graph.add_edge(from, to, i);
                }
            }
        }

        Self { graph, index_map }
    }

    /// Clause and element index that expand to `id`, if any.
    pub fn parent_of(&self, id: &ClauseId) -> Option<(&ClauseId, usize)> {
        let idx = *self.index_map.get(id)?;
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .next()
            .map(|edge| (&self.graph[edge.source()], *edge.weight()))
    }

    /// Every group of clauses that reach themselves through `expandsTo`.
    pub fn cycles(&self) -> Vec<Vec<ClauseId>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|scc| {
                let mut ids: Vec<ClauseId> = scc.into_iter().map(|n| self.graph[n].clone()).collect();
                ids.sort();
                ids
            })
            .collect()
    }

    pub fn is_tree(&self) -> bool {
        self.cycles().is_empty()
    }
}
