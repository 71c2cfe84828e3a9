#[macro_use]
extern crate lazy_static;

use async_trait::async_trait;
use serde::Deserialize;
use strum_macros::AsRefStr;

pub use client::LanguageClient;
pub use config::{AnalyzerConfig, DelegationConfig};
pub use error::DelegationFailure;

mod client;
mod config;
mod error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub sentiment: Sentiment,
    pub confidence: Option<ConfidenceScores>,
    pub key_phrases: Vec<String>,
}

/// An external service that can describe free text.
///
/// Implementations are best-effort: callers treat every
/// [`DelegationFailure`] as a signal to answer locally instead.
#[async_trait]
pub trait Analyzer: Sync + Send {
    async fn analyze(&self, text: &str) -> Result<Analysis, DelegationFailure>;
}
