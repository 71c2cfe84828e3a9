use rocket::figment::{providers::Env, Figment};
use serde::Deserialize;

use analyzer::AnalyzerConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
}

/// Rocket's own configuration sources plus `APP_` environment variables,
/// where the first `_` after the prefix separates the section,
/// e.g. `APP_ANALYZER_ACCESS_KEY` sets `analyzer.access_key`.
pub fn figment() -> Figment {
    rocket::Config::figment()
        .merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}
