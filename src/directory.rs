use std::collections::HashMap;

use crate::graph::VictoryGraph;
use crate::roster::TeamRecord;

/// Auxiliary display attributes for one team. Fields are empty strings when
/// the roster has nothing for the team; lookups never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamAttributes {
    pub logo: String,
    pub mascot: String,
}

/// Bidirectional team name/id/attribute lookups, built once at startup from
/// the victory graph's node labels and the roster artifact.
///
/// Resolution is exact-match on the normalized (trimmed, lowercased) name:
/// no fuzzy or partial matching.
pub struct Directory {
    id_to_name: HashMap<String, String>,
    name_to_id: HashMap<String, String>,
    attributes: HashMap<String, TeamAttributes>,
    team_names: Vec<String>,
}

/// Normalize a display name for lookup: trim whitespace, lowercase.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Directory {
    pub fn new(graph: &VictoryGraph, roster: &[TeamRecord]) -> Self {
        let mut id_to_name = HashMap::new();
        let mut name_to_id: HashMap<String, String> = HashMap::new();

        for team in graph.teams() {
            // Display name falls back to the raw id when the node has no label
            let name = team.label.clone().unwrap_or_else(|| team.id.clone());

            let key = normalize(&name);
            if key.is_empty() {
                // A blank normalized name is never indexed
                log::warn!("Team {} has a blank display name, skipping lookup entry", team.id);
            } else {
                if let Some(previous) = name_to_id.insert(key, team.id.clone()) {
                    log::warn!(
                        "Duplicate team name {:?}: id {} replaces id {}",
                        name,
                        team.id,
                        previous
                    );
                }
            }

            id_to_name.insert(team.id.clone(), name);
        }

        let mut attributes = HashMap::new();
        for record in roster {
            if !id_to_name.contains_key(&record.id) {
                log::debug!("Roster record {} has no graph node, ignoring", record.id);
                continue;
            }
            attributes.insert(
                record.id.clone(),
                TeamAttributes {
                    logo: record.logo.clone().unwrap_or_default(),
                    mascot: record.mascot.clone().unwrap_or_default(),
                },
            );
        }

        let mut team_names: Vec<String> = id_to_name.values().cloned().collect();
        team_names.sort();
        team_names.dedup();

        Self {
            id_to_name,
            name_to_id,
            attributes,
            team_names,
        }
    }

    /// Resolve a raw display name to a team id. Blank input never resolves.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(&normalize(name)).map(String::as_str)
    }

    /// Display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.id_to_name.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Auxiliary attributes for an id; empty fields when the roster has none.
    pub fn attributes(&self, id: &str) -> TeamAttributes {
        self.attributes.get(id).cloned().unwrap_or_default()
    }

    /// Sorted, deduplicated display names of every team in the graph.
    pub fn team_names(&self) -> &[String] {
        &self.team_names
    }
}
