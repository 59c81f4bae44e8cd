pub mod config;
pub mod directory;
pub mod error;
pub mod graph;
pub mod http;
pub mod llm;
pub mod roster;
pub mod service;

pub use config::Config;
pub use error::{BeatpathError, Result};
pub use service::{PathFinder, PathOutcome, PathResult};
