//! Error types for channel resolution

use std::fmt;

#[derive(Debug)]
pub enum ResolveError {
    /// Input matches none of the accepted identifier shapes
    InvalidIdentifier(String),
    /// The page was fetched (or not) but no canonical ID could be extracted
    ResolutionFailed(String),
    Http(Box<reqwest::Error>),
}

impl ResolveError {
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, ResolveError::InvalidIdentifier(_))
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidIdentifier(id) => write!(f, "Invalid channel identifier: {}", id),
            ResolveError::ResolutionFailed(msg) => write!(f, "Resolution failed: {}", msg),
            ResolveError::Http(err) => write!(f, "HTTP error: {}", err),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Http(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_display() {
        let err = ResolveError::InvalidIdentifier("what".to_string());
        assert_eq!(format!("{}", err), "Invalid channel identifier: what");
        assert!(err.is_invalid_identifier());
    }

    #[test]
    fn test_resolution_failed_display() {
        let err = ResolveError::ResolutionFailed("no channel ID in page".to_string());
        assert_eq!(
            format!("{}", err),
            "Resolution failed: no channel ID in page"
        );
        assert!(!err.is_invalid_identifier());
    }
}
