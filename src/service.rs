//! Path lookup core: resolve two team names, find the minimum-weight
//! victory chain, or fall back to a generated explanation when the graph
//! is disconnected for the pair.

use serde::Serialize;

use crate::directory::Directory;
use crate::error::BeatpathError;
use crate::graph::VictoryGraph;
use crate::llm::MatchupExplainer;

const UNKNOWN_TEAM_MSG: &str = "Unknown team name provided.";
const SAME_TEAM_MSG: &str = "Choose two different teams.";

/// One hop of a victory chain as reported to clients.
///
/// from/to/label are omitted on the narrative-fallback edge, which is not a
/// literal graph path and must not fabricate a result label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "fromLogo")]
    pub from_logo: String,
    #[serde(rename = "toLogo")]
    pub to_logo: String,
}

/// Exhaustive outcome of one path lookup.
///
/// Exactly one variant per request; the flat wire shape clients consume is
/// derived via [`PathOutcome::into_result`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// A directed victory chain connects source to destination.
    Found {
        path: Vec<String>,
        edges: Vec<EdgeDescriptor>,
    },
    /// Both names resolve to the same team.
    SameTeam { name: String },
    /// One or both names do not resolve to a team in the graph.
    UnknownTeam,
    /// No chain exists; the LLM fallback produced a narrative.
    Narrative {
        from: String,
        to: String,
        from_logo: String,
        to_logo: String,
        text: String,
    },
    /// No chain exists and the fallback was unavailable or failed.
    NoPath { reason: String },
}

/// Flat result object for the HTTP contract: ordered display names, edge
/// descriptors, optional error classification, optional fallback narrative.
#[derive(Debug, Clone, Serialize)]
pub struct PathResult {
    pub path: Vec<String>,
    pub edges: Vec<EdgeDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_text: Option<String>,
}

impl PathOutcome {
    pub fn into_result(self) -> PathResult {
        match self {
            PathOutcome::Found { path, edges } => PathResult {
                path,
                edges,
                error: None,
                llm_text: None,
            },
            PathOutcome::SameTeam { name } => PathResult {
                path: vec![name],
                edges: Vec::new(),
                error: Some(SAME_TEAM_MSG.to_string()),
                llm_text: None,
            },
            PathOutcome::UnknownTeam => PathResult {
                path: Vec::new(),
                edges: Vec::new(),
                error: Some(UNKNOWN_TEAM_MSG.to_string()),
                llm_text: None,
            },
            PathOutcome::Narrative {
                from,
                to,
                from_logo,
                to_logo,
                text,
            } => PathResult {
                path: vec![from, to],
                edges: vec![EdgeDescriptor {
                    from: None,
                    to: None,
                    label: None,
                    from_logo,
                    to_logo,
                }],
                error: None,
                llm_text: Some(text),
            },
            PathOutcome::NoPath { reason } => PathResult {
                path: Vec::new(),
                edges: Vec::new(),
                error: Some(reason),
                llm_text: None,
            },
        }
    }
}

/// Resolves team names and answers victory-chain lookups over the loaded,
/// immutable graph. Safe to share across requests; nothing mutates after
/// construction.
pub struct PathFinder {
    graph: VictoryGraph,
    directory: Directory,
    explainer: MatchupExplainer,
}

impl PathFinder {
    pub fn new(graph: VictoryGraph, directory: Directory, explainer: MatchupExplainer) -> Self {
        Self {
            graph,
            directory,
            explainer,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Sorted display names for enumeration endpoints.
    pub fn team_names(&self) -> &[String] {
        self.directory.team_names()
    }

    /// Find the minimum-weight victory chain from one named team to another.
    ///
    /// Inputs are normalized (trim + lowercase) before resolution; blank or
    /// unknown names short-circuit before any graph query.
    pub async fn find_path(&self, from: &str, to: &str) -> PathOutcome {
        let src = match self.directory.resolve(from) {
            Some(id) => id.to_string(),
            None => return PathOutcome::UnknownTeam,
        };
        let dst = match self.directory.resolve(to) {
            Some(id) => id.to_string(),
            None => return PathOutcome::UnknownTeam,
        };

        if src == dst {
            return PathOutcome::SameTeam {
                name: self.directory.display_name(&src).to_string(),
            };
        }

        // A resolved id missing from the graph is still an unknown team,
        // distinct from a connected graph with no path between the pair.
        if !self.graph.contains(&src) || !self.graph.contains(&dst) {
            return PathOutcome::UnknownTeam;
        }

        match self.graph.shortest_path(&src, &dst) {
            Some(ids) => self.assemble_chain(&ids),
            None => self.fallback(&src, &dst).await,
        }
    }

    /// Build display names and per-hop descriptors for a found chain.
    fn assemble_chain(&self, ids: &[&str]) -> PathOutcome {
        let path: Vec<String> = ids
            .iter()
            .map(|id| self.directory.display_name(id).to_string())
            .collect();

        let mut edges = Vec::with_capacity(ids.len().saturating_sub(1));
        for pair in ids.windows(2) {
            let (winner, loser) = (pair[0], pair[1]);
            let winner_name = self.directory.display_name(winner);
            let loser_name = self.directory.display_name(loser);

            let label = self
                .graph
                .game_between(winner, loser)
                .and_then(|game| game.label.clone())
                .unwrap_or_else(|| format!("{} def. {}", winner_name, loser_name));

            edges.push(EdgeDescriptor {
                from: Some(winner_name.to_string()),
                to: Some(loser_name.to_string()),
                label: Some(label),
                from_logo: self.directory.attributes(winner).logo,
                to_logo: self.directory.attributes(loser).logo,
            });
        }

        PathOutcome::Found { path, edges }
    }

    /// No directed chain exists: delegate to the narrative fallback.
    async fn fallback(&self, src: &str, dst: &str) -> PathOutcome {
        match self.explainer.explain(&self.directory, src, dst).await {
            Ok(text) => PathOutcome::Narrative {
                from: self.directory.display_name(src).to_string(),
                to: self.directory.display_name(dst).to_string(),
                from_logo: self.directory.attributes(src).logo,
                to_logo: self.directory.attributes(dst).logo,
                text,
            },
            Err(BeatpathError::LlmNotConfigured) => PathOutcome::NoPath {
                reason: BeatpathError::LlmNotConfigured.to_string(),
            },
            Err(e) => {
                log::warn!("LLM fallback failed: {}", e);
                let details = match e {
                    BeatpathError::Llm(details) => details,
                    other => other.to_string(),
                };
                PathOutcome::NoPath {
                    reason: format!("Error generating LLM response: {}", details),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::llm::TextGenerator;
    use crate::roster::TeamRecord;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubGenerator;

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Ok("The Crimson Tide would overwhelm the Jumbo through sheer ferocity.".to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Err(BeatpathError::Llm("API Error".to_string()))
        }
    }

    /// Five teams: a weight-1 chain Alabama -> Georgia -> Auburn -> Vanderbilt,
    /// a heavy historical back-edge Auburn -> Alabama, and Tufts isolated.
    fn test_graph() -> VictoryGraph {
        let mut graph = VictoryGraph::new();
        graph.add_team("0", Some("Alabama"));
        graph.add_team("1", Some("Georgia"));
        graph.add_team("2", Some("Auburn"));
        graph.add_team("3", Some("Vanderbilt"));
        graph.add_team("4", Some("Tufts"));
        graph.add_game("0", "1", 1.0, Some("Alabama def. Georgia"));
        graph.add_game("1", "2", 1.0, Some("Georgia def. Auburn"));
        graph.add_game("2", "3", 1.0, Some("Auburn def. Vanderbilt"));
        graph.add_game("2", "0", 2025.0, Some("Auburn def. Alabama (2024)"));
        graph
    }

    fn test_roster() -> Vec<TeamRecord> {
        serde_json::from_str(
            r#"[
            {"id": 0, "name": "Alabama", "mascot": "Crimson Tide", "logo": "https://example.com/alabama.png"},
            {"id": 1, "name": "Georgia", "mascot": "Bulldogs", "logo": "https://example.com/georgia.png"},
            {"id": 2, "name": "Auburn", "mascot": "Tigers", "logo": "https://example.com/auburn.png"},
            {"id": 3, "name": "Vanderbilt", "mascot": "Commodores", "logo": "https://example.com/vanderbilt.png"},
            {"id": 4, "name": "Tufts", "mascot": "Jumbos", "logo": "https://example.com/tufts.png"}
        ]"#,
        )
        .unwrap()
    }

    fn finder_with(generator: Option<Arc<dyn TextGenerator>>) -> PathFinder {
        let graph = test_graph();
        let directory = Directory::new(&graph, &test_roster());
        PathFinder::new(graph, directory, MatchupExplainer::new(generator))
    }

    fn finder() -> PathFinder {
        finder_with(None)
    }

    #[tokio::test]
    async fn test_find_path_follows_chain() {
        let outcome = finder().find_path("Alabama", "Auburn").await;
        match outcome {
            PathOutcome::Found { path, edges } => {
                assert_eq!(path, vec!["Alabama", "Georgia", "Auburn"]);
                assert_eq!(edges.len(), 2);
                assert_eq!(edges[0].from.as_deref(), Some("Alabama"));
                assert_eq!(edges[0].to.as_deref(), Some("Georgia"));
                assert_eq!(edges[1].from.as_deref(), Some("Georgia"));
                assert_eq!(edges[1].to.as_deref(), Some("Auburn"));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_edges_align_with_path() {
        let outcome = finder().find_path("Alabama", "Vanderbilt").await;
        let result = outcome.into_result();
        assert!(result.error.is_none());
        assert_eq!(result.edges.len(), result.path.len() - 1);
        for (i, edge) in result.edges.iter().enumerate() {
            assert_eq!(edge.from.as_deref(), Some(result.path[i].as_str()));
            assert_eq!(edge.to.as_deref(), Some(result.path[i + 1].as_str()));
        }
    }

    #[tokio::test]
    async fn test_find_path_includes_logos() {
        let outcome = finder().find_path("Alabama", "Auburn").await;
        let result = outcome.into_result();
        for edge in &result.edges {
            assert!(!edge.from_logo.is_empty());
            assert!(!edge.to_logo.is_empty());
        }
    }

    #[tokio::test]
    async fn test_find_path_traverses_historical_back_edge() {
        // Georgia -> Alabama only exists through the weight-2025 edge
        let outcome = finder().find_path("Georgia", "Alabama").await;
        match outcome {
            PathOutcome::Found { path, edges } => {
                assert_eq!(path, vec!["Georgia", "Auburn", "Alabama"]);
                assert_eq!(edges.len(), 2);
                assert!(edges[1].label.as_deref().unwrap().contains("(2024)"));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_path_synthesizes_missing_label() {
        let mut graph = test_graph();
        graph.add_game("3", "4", 1.0, None);
        let directory = Directory::new(&graph, &test_roster());
        let finder = PathFinder::new(graph, directory, MatchupExplainer::new(None));

        let outcome = finder.find_path("Vanderbilt", "Tufts").await;
        match outcome {
            PathOutcome::Found { edges, .. } => {
                assert_eq!(edges[0].label.as_deref(), Some("Vanderbilt def. Tufts"));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_path_is_case_and_whitespace_insensitive() {
        let finder = finder();
        let trimmed = finder.find_path(" Alabama ", "AUBURN").await;
        let lower = finder.find_path("alabama", "auburn").await;
        assert_eq!(trimmed, lower);
        assert!(matches!(trimmed, PathOutcome::Found { .. }));
    }

    #[tokio::test]
    async fn test_find_path_same_team() {
        let finder = finder();
        for (a, b) in [("Alabama", "Alabama"), ("alabama", " ALABAMA ")] {
            let outcome = finder.find_path(a, b).await;
            assert_eq!(
                outcome,
                PathOutcome::SameTeam {
                    name: "Alabama".to_string()
                }
            );
            let result = outcome.into_result();
            assert_eq!(result.path, vec!["Alabama"]);
            assert!(result.edges.is_empty());
            assert_eq!(result.error.as_deref(), Some("Choose two different teams."));
        }
    }

    #[tokio::test]
    async fn test_find_path_unknown_team() {
        let finder = finder();
        for (a, b) in [("Unknown Team", "Alabama"), ("Alabama", "Unknown Team")] {
            let outcome = finder.find_path(a, b).await;
            assert_eq!(outcome, PathOutcome::UnknownTeam);
            let result = outcome.into_result();
            assert!(result.path.is_empty());
            assert!(result.edges.is_empty());
            assert_eq!(result.error.as_deref(), Some("Unknown team name provided."));
        }
    }

    #[tokio::test]
    async fn test_find_path_blank_input() {
        let finder = finder();
        assert_eq!(finder.find_path("", "Alabama").await, PathOutcome::UnknownTeam);
        assert_eq!(finder.find_path("Alabama", "   ").await, PathOutcome::UnknownTeam);
        assert_eq!(finder.find_path("", "").await, PathOutcome::UnknownTeam);
    }

    #[tokio::test]
    async fn test_find_path_no_path_without_llm() {
        let outcome = finder().find_path("Alabama", "Tufts").await;
        assert_eq!(
            outcome,
            PathOutcome::NoPath {
                reason: "LLM service not configured.".to_string()
            }
        );
        let result = outcome.into_result();
        assert!(result.llm_text.is_none());
        assert!(result.path.is_empty());
        assert!(result.edges.is_empty());
    }

    #[tokio::test]
    async fn test_find_path_no_path_with_llm() {
        let finder = finder_with(Some(Arc::new(StubGenerator)));
        let outcome = finder.find_path("Alabama", "Tufts").await;

        let result = outcome.into_result();
        assert!(result.error.is_none());
        assert_eq!(result.path, vec!["Alabama", "Tufts"]);
        assert_eq!(result.edges.len(), 1);

        // The fallback edge is not a literal game: only the logos are set
        let edge = &result.edges[0];
        assert!(edge.from.is_none());
        assert!(edge.to.is_none());
        assert!(edge.label.is_none());
        assert_eq!(edge.from_logo, "https://example.com/alabama.png");
        assert_eq!(edge.to_logo, "https://example.com/tufts.png");

        let text = result.llm_text.unwrap();
        assert!(text.contains("sheer ferocity"));
    }

    #[tokio::test]
    async fn test_find_path_llm_failure() {
        let finder = finder_with(Some(Arc::new(FailingGenerator)));
        let outcome = finder.find_path("Alabama", "Tufts").await;

        match &outcome {
            PathOutcome::NoPath { reason } => {
                assert!(reason.contains("Error generating LLM response"));
                assert!(reason.contains("API Error"));
            }
            other => panic!("expected NoPath, got {:?}", other),
        }
        let result = outcome.into_result();
        assert!(result.llm_text.is_none());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_wire_shape_of_found_result() {
        let outcome = finder().find_path("Alabama", "Georgia").await;
        let json = serde_json::to_value(outcome.into_result()).unwrap();

        assert_eq!(json["path"][0], "Alabama");
        assert_eq!(json["edges"][0]["from"], "Alabama");
        assert_eq!(json["edges"][0]["label"], "Alabama def. Georgia");
        assert!(json["edges"][0].get("fromLogo").is_some());
        assert!(json["edges"][0].get("toLogo").is_some());
        assert!(json.get("error").is_none());
        assert!(json.get("llm_text").is_none());
    }

    #[tokio::test]
    async fn test_wire_shape_of_narrative_result() {
        let finder = finder_with(Some(Arc::new(StubGenerator)));
        let outcome = finder.find_path("Alabama", "Tufts").await;
        let json = serde_json::to_value(outcome.into_result()).unwrap();

        let edge = &json["edges"][0];
        assert!(edge.get("from").is_none());
        assert!(edge.get("to").is_none());
        assert!(edge.get("label").is_none());
        assert!(edge.get("fromLogo").is_some());
        assert!(edge.get("toLogo").is_some());
        assert!(json.get("llm_text").is_some());
    }

    #[tokio::test]
    async fn test_team_names_round_trip() {
        let finder = finder();
        assert_eq!(finder.team_names().len(), 5);
        for name in finder.team_names() {
            let id = finder.directory().resolve(name);
            assert!(id.is_some(), "name {:?} did not resolve", name);
        }
    }
}
