//! Error taxonomy for the aggregation engine

use channel_resolver::ResolveError;
use std::fmt;
use std::time::Duration;

/// Which rate limit policy rejected a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    /// Per-actor request budget
    Global,
    /// Per-(actor, channel) vote cooldown
    Vote,
}

#[derive(Debug)]
pub enum EngineError {
    InvalidIdentifier(String),
    ResolutionFailed(String),
    RateLimited {
        scope: RateLimitScope,
        retry_after: Duration,
    },
    Unauthorized,
    Forbidden,
    Database(sqlx::Error),
}

impl EngineError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidIdentifier(_) => "invalid_identifier",
            EngineError::ResolutionFailed(_) => "resolution_failed",
            EngineError::RateLimited { .. } => "rate_limited",
            EngineError::Unauthorized => "unauthorized",
            EngineError::Forbidden => "forbidden",
            EngineError::Database(_) => "internal",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidIdentifier(id) => write!(f, "Invalid channel identifier: {}", id),
            EngineError::ResolutionFailed(msg) => write!(f, "Failed to resolve channel: {}", msg),
            EngineError::RateLimited {
                scope: RateLimitScope::Global,
                ..
            } => write!(f, "Too many requests"),
            EngineError::RateLimited {
                scope: RateLimitScope::Vote,
                ..
            } => write!(f, "Already voted on this channel recently"),
            EngineError::Unauthorized => write!(f, "Authentication required"),
            EngineError::Forbidden => write!(f, "Not an administrator"),
            EngineError::Database(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Database(err)
    }
}

impl From<ResolveError> for EngineError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidIdentifier(id) => EngineError::InvalidIdentifier(id),
            ResolveError::ResolutionFailed(msg) => EngineError::ResolutionFailed(msg),
            // Network failures and timeouts are resolution failures to the caller
            ResolveError::Http(err) => EngineError::ResolutionFailed(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(
            EngineError::InvalidIdentifier("x".into()).kind(),
            "invalid_identifier"
        );
        assert_eq!(
            EngineError::ResolutionFailed("x".into()).kind(),
            "resolution_failed"
        );
        assert_eq!(
            EngineError::RateLimited {
                scope: RateLimitScope::Vote,
                retry_after: Duration::from_secs(1)
            }
            .kind(),
            "rate_limited"
        );
        assert_eq!(EngineError::Unauthorized.kind(), "unauthorized");
        assert_eq!(EngineError::Forbidden.kind(), "forbidden");
        assert_eq!(EngineError::Database(sqlx::Error::RowNotFound).kind(), "internal");
    }

    #[test]
    fn test_resolve_error_mapping() {
        let err: EngineError = ResolveError::InvalidIdentifier("abc".into()).into();
        assert!(matches!(err, EngineError::InvalidIdentifier(ref id) if id == "abc"));

        let err: EngineError = ResolveError::ResolutionFailed("no match".into()).into();
        assert!(matches!(err, EngineError::ResolutionFailed(_)));
    }

    #[test]
    fn test_rate_limited_display_distinguishes_scope() {
        let global = EngineError::RateLimited {
            scope: RateLimitScope::Global,
            retry_after: Duration::ZERO,
        };
        let vote = EngineError::RateLimited {
            scope: RateLimitScope::Vote,
            retry_after: Duration::ZERO,
        };
        assert_eq!(global.to_string(), "Too many requests");
        assert_eq!(vote.to_string(), "Already voted on this channel recently");
    }
}
