use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};

use analyzer::{Analysis, Analyzer, DelegationConfig, DelegationFailure, LanguageClient};
use expression::format_number;
use telemetry::Measure;

use crate::reply;

lazy_static! {
    static ref CALCULATE_MEASURE: Measure = Measure::new("router", "calculate");
    static ref DELEGATE_MEASURE: Measure = Measure::new("router", "delegate");
}

/// What a single turn of user text asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Help,
    About,
    Time,
    Calc(String),
    Fallback(String),
}

fn calc_argument(text: &str) -> Option<&str> {
    let keyword = text.get(..4)?;
    let rest = text.get(4..)?;
    if !keyword.eq_ignore_ascii_case("calc") || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim()).filter(|argument| !argument.is_empty())
}

/// Classifies `text`, ignoring case and surrounding whitespace. The first
/// matching rule wins.
pub fn classify(text: &str) -> Intent {
    let text = text.trim();
    if text.eq_ignore_ascii_case("help") {
        Intent::Help
    } else if text.eq_ignore_ascii_case("about") {
        Intent::About
    } else if text.eq_ignore_ascii_case("time") {
        Intent::Time
    } else if let Some(argument) = calc_argument(text) {
        Intent::Calc(argument.to_string())
    } else {
        Intent::Fallback(text.to_string())
    }
}

struct Delegate {
    analyzer: Arc<dyn Analyzer>,
    timeout: Duration,
}

/// Answers one turn at a time. Holds no per-conversation state, so a
/// single instance is shared by every request.
pub struct CommandRouter {
    delegate: Option<Delegate>,
}

impl CommandRouter {
    pub fn local() -> CommandRouter {
        CommandRouter { delegate: None }
    }

    pub fn delegating(analyzer: Arc<dyn Analyzer>, timeout: Duration) -> CommandRouter {
        CommandRouter {
            delegate: Some(Delegate { analyzer, timeout }),
        }
    }

    pub fn from_delegation(
        client: reqwest::Client,
        delegation: Option<DelegationConfig>,
    ) -> CommandRouter {
        match delegation {
            Some(config) => {
                let analyzer = LanguageClient::new(client, &config);
                CommandRouter::delegating(Arc::new(analyzer), config.timeout)
            }
            None => CommandRouter::local(),
        }
    }

    pub async fn dispatch(&self, text: &str) -> String {
        let intent = classify(text);
        debug!("Classified message as {:?}", intent);
        self.respond(intent).await
    }

    pub async fn respond(&self, intent: Intent) -> String {
        match intent {
            Intent::Help => reply::help(),
            Intent::About => reply::about(self.delegate.is_some()),
            Intent::Time => reply::time(Utc::now()),
            Intent::Calc(argument) => calculate(&argument),
            Intent::Fallback(text) => self.fallback(&text).await,
        }
    }

    async fn fallback(&self, text: &str) -> String {
        if text.is_empty() {
            return reply::empty();
        }

        if let Some(delegate) = &self.delegate {
            match delegate.analyze(text).await {
                Ok(analysis) => return reply::analysis(&analysis),
                Err(e) => warn!("Delegation failed, answering locally: {}", e),
            }
        }
        reply::reversed(text)
    }
}

impl Delegate {
    async fn analyze(&self, text: &str) -> Result<Analysis, DelegationFailure> {
        DELEGATE_MEASURE
            .stats(async move {
                tokio::time::timeout(self.timeout, self.analyzer.analyze(text))
                    .await
                    .unwrap_or(Err(DelegationFailure::Timeout))
            })
            .await
    }
}

fn calculate(argument: &str) -> String {
    match CALCULATE_MEASURE.observe(|| expression::calculate(argument)) {
        Ok(v) => format_number(v),
        Err(e) => reply::calc_error(&e),
    }
}
