//! Victory graph module: the precomputed "A beat B" digraph and its
//! minimum-weight chain search.
//!
//! Nodes are teams keyed by a graph-native string id; edges are directed
//! winner -> loser relations weighted so that more preferred results (e.g.
//! more recent games) carry lower weight and win the shortest-path search.

mod gexf;

pub use gexf::load_gexf;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// A team node: graph-native id plus the optional display label.
#[derive(Debug, Clone)]
pub struct TeamNode {
    pub id: String,
    pub label: Option<String>,
}

/// A directed winner -> loser edge.
///
/// Weight is the shortest-path cost: lower weight means a more preferred
/// relation. The label describes the concrete result, e.g.
/// `"Auburn def. Alabama (2024)"`.
#[derive(Debug, Clone)]
pub struct GameEdge {
    pub weight: f64,
    pub label: Option<String>,
}

/// In-memory victory graph for fast chain lookups.
///
/// Read-only after load; cycles and parallel edges are permitted.
#[derive(Debug)]
pub struct VictoryGraph {
    graph: DiGraph<TeamNode, GameEdge>,
    indices: HashMap<String, NodeIndex>,
}

impl VictoryGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            indices: HashMap::new(),
        }
    }

    /// Add a team node, or return the existing one for this id.
    ///
    /// A label supplied on a later call fills in a node first created
    /// implicitly by an edge; an existing label is never overwritten.
    pub fn add_team(&mut self, id: &str, label: Option<&str>) -> NodeIndex {
        if let Some(&node) = self.indices.get(id) {
            if let Some(label) = label {
                let team = &mut self.graph[node];
                if team.label.is_none() {
                    team.label = Some(label.to_string());
                }
            }
            return node;
        }

        let node = self.graph.add_node(TeamNode {
            id: id.to_string(),
            label: label.map(str::to_string),
        });
        self.indices.insert(id.to_string(), node);
        node
    }

    /// Add a directed winner -> loser game edge, creating nodes as needed.
    pub fn add_game(&mut self, winner: &str, loser: &str, weight: f64, label: Option<&str>) {
        let from = self.add_team(winner, None);
        let to = self.add_team(loser, None);
        self.graph.add_edge(
            from,
            to,
            GameEdge {
                weight,
                label: label.map(str::to_string),
            },
        );
    }

    pub fn contains(&self, id: &str) -> bool {
        self.indices.contains_key(id)
    }

    pub fn team_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn game_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate all team nodes in the graph.
    pub fn teams(&self) -> impl Iterator<Item = &TeamNode> {
        self.graph.node_weights()
    }

    /// Minimum-total-weight directed path between two team ids.
    ///
    /// Returns the visited ids from source to destination inclusive, or None
    /// when either id is absent or no directed path connects them. Ties are
    /// broken by the search's traversal order.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<&str>> {
        let src = *self.indices.get(from)?;
        let dst = *self.indices.get(to)?;

        let (_cost, path) = astar(
            &self.graph,
            src,
            |node| node == dst,
            |edge| edge.weight().weight,
            |_| 0.0,
        )?;

        Some(path.into_iter().map(|ix| self.graph[ix].id.as_str()).collect())
    }

    /// The game edge a shortest path would use between two adjacent teams:
    /// the minimum-weight edge among parallel winner -> loser edges.
    pub fn game_between(&self, winner: &str, loser: &str) -> Option<&GameEdge> {
        let from = *self.indices.get(winner)?;
        let to = *self.indices.get(loser)?;
        self.graph
            .edges_connecting(from, to)
            .map(|edge| edge.weight())
            .min_by(|a, b| {
                a.weight
                    .partial_cmp(&b.weight)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

impl Default for VictoryGraph {
    fn default() -> Self {
        Self::new()
    }
}
