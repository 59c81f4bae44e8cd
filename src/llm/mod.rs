//! LLM fallback module: the injected text-generation capability and the
//! matchup explainer that uses it when the victory graph is disconnected
//! for a requested pair.

mod gemini;

pub use gemini::GeminiClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::directory::Directory;
use crate::error::{BeatpathError, Result};

/// Fixed analyst persona for the fallback prediction.
const SYSTEM_PROMPT: &str = "You are an expert college football analyst in a parallel universe where games are decided by competitions between the teams' mascots. \
The parameters of the contest are as follows: Each mascot has a unique set of skills and attributes that reflect the spirit and culture of their respective teams.\
The mascots will engage in a series of challenges that test their agility, strength, intelligence, and teamwork. \
Your analysis should consider these factors and provide a clear rationale for your prediction. \
Given two college football teams, provide a prediction as to why one team would defeat the other in under 150 words";

/// Injected text-generation capability.
///
/// The only non-deterministic, externally-dependent operation in the crate
/// lives behind this trait; tests substitute a deterministic stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Generates a narrative for why one team would beat another when no
/// victory chain connects them.
pub struct MatchupExplainer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl MatchupExplainer {
    /// Pass None when no credential is configured; explain() then reports
    /// the not-configured state instead of calling anything.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Produce a free-text prediction that `victor_id` would beat `loser_id`.
    ///
    /// Prompt subjects are the display name plus the roster mascot so the
    /// narrative can lean on both. Generator failures come back as
    /// `BeatpathError::Llm`, never a panic.
    pub async fn explain(
        &self,
        directory: &Directory,
        victor_id: &str,
        loser_id: &str,
    ) -> Result<String> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(BeatpathError::LlmNotConfigured)?;

        let prompt = format!(
            "Explain why {} would defeat {} in a college football game.",
            subject(directory, victor_id),
            subject(directory, loser_id)
        );

        let start = std::time::Instant::now();
        let text = generator.generate(SYSTEM_PROMPT, &prompt).await?;
        log::debug!("LLM fallback call took {:?}", start.elapsed());

        Ok(text)
    }
}

/// Prompt subject for one team: display name plus mascot when known.
fn subject(directory: &Directory, id: &str) -> String {
    let name = directory.display_name(id);
    let mascot = directory.attributes(id).mascot;
    if mascot.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, mascot)
    }
}
