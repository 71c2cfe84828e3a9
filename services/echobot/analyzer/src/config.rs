use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyzerConfig {
    // Base URL of the language service
    pub endpoint: Option<String>,

    pub access_key: Option<String>,

    pub timeout_ms: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> AnalyzerConfig {
        AnalyzerConfig {
            endpoint: None,
            access_key: None,
            timeout_ms: 5000,
        }
    }
}

/// Connection parameters for a configured language service
#[derive(Debug, Clone, PartialEq)]
pub struct DelegationConfig {
    pub endpoint: String,
    pub access_key: String,
    pub timeout: Duration,
}

fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl AnalyzerConfig {
    /// Returns `None`, meaning free text is answered locally, unless both
    /// the endpoint and the access key are set.
    pub fn delegation(&self) -> Option<DelegationConfig> {
        Some(DelegationConfig {
            endpoint: non_blank(&self.endpoint)?,
            access_key: non_blank(&self.access_key)?,
            timeout: Duration::from_millis(self.timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>, access_key: Option<&str>) -> AnalyzerConfig {
        AnalyzerConfig {
            endpoint: endpoint.map(str::to_string),
            access_key: access_key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_delegation() {
        let delegation = config(Some(" https://lang.example.com "), Some("secret"))
            .delegation()
            .expect("configured");

        assert_eq!(delegation.endpoint, "https://lang.example.com");
        assert_eq!(delegation.access_key, "secret");
        assert_eq!(delegation.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_not_configured() {
        assert_eq!(AnalyzerConfig::default().delegation(), None);
        assert_eq!(config(Some("https://lang.example.com"), None).delegation(), None);
        assert_eq!(config(None, Some("secret")).delegation(), None);
        assert_eq!(config(Some("https://lang.example.com"), Some("  ")).delegation(), None);
        assert_eq!(config(Some(""), Some("secret")).delegation(), None);
    }
}
