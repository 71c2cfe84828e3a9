use derive_more::Display;
use reqwest::StatusCode;

use telemetry::IsErr;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum DelegationFailure {
    #[display(fmt = "Timed out")]
    Timeout,

    #[display(fmt = "Authentication rejected")]
    AuthError,

    #[display(fmt = "Service Error: {}", _0)]
    ServiceError(String),
}

impl std::error::Error for DelegationFailure {}

impl IsErr for DelegationFailure {}

impl DelegationFailure {
    pub(crate) fn from_status(status: StatusCode) -> Option<DelegationFailure> {
        match status {
            s if s.is_success() => None,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(DelegationFailure::AuthError),
            s => Some(DelegationFailure::ServiceError(format!("Status {}", s))),
        }
    }
}

impl From<reqwest::Error> for DelegationFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return DelegationFailure::Timeout;
        }
        match e.status().and_then(DelegationFailure::from_status) {
            Some(failure) => failure,
            None => DelegationFailure::ServiceError(format!("Reqwest Error: {}", e)),
        }
    }
}
