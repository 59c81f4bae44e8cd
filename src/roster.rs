use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{BeatpathError, Result};

/// One roster record as loaded from the teams JSON artifact.
///
/// Records carry more fields than this service uses (win/loss counts etc.);
/// everything beyond id, name, mascot and logo is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRecord {
    /// Graph-native id; numeric ids are stringified so they match node keys.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mascot: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(i64),
        Str(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(n) => n.to_string(),
        IdRepr::Str(s) => s,
    })
}

/// Load the team roster from a JSON file.
///
/// A missing roster file is not fatal: teams then simply have no logo or
/// mascot, matching how unmatched roster rows are already ignored.
pub fn load_roster(path: &Path) -> Result<Vec<TeamRecord>> {
    if !path.exists() {
        log::warn!(
            "Roster file not found at {} - continuing with an empty roster",
            path.display()
        );
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    parse_roster(&content, &path.display().to_string())
}

fn parse_roster(content: &str, source: &str) -> Result<Vec<TeamRecord>> {
    serde_json::from_str(content)
        .map_err(|e| BeatpathError::Parse(format!("Roster parse error in {}: {}", source, e)))
}
