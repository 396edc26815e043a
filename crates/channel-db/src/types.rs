use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use ts_rs::TS;

/// Display name a record carries until a real one is backfilled
pub const DEFAULT_CHANNEL_NAME: &str = "Unknown";

/// Admin-asserted verification state, independent of crowd votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    VerifiedOwned,
    VerifiedIndependent,
}

impl From<VerificationStatus> for u8 {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Unverified => 0,
            VerificationStatus::VerifiedOwned => 1,
            VerificationStatus::VerifiedIndependent => 2,
        }
    }
}

impl TryFrom<u8> for VerificationStatus {
    type Error = InvalidVerificationStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VerificationStatus::Unverified),
            1 => Ok(VerificationStatus::VerifiedOwned),
            2 => Ok(VerificationStatus::VerifiedIndependent),
            other => Err(InvalidVerificationStatus(other as i64)),
        }
    }
}

impl TryFrom<i64> for VerificationStatus {
    type Error = InvalidVerificationStatus;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| InvalidVerificationStatus(value))
            .and_then(VerificationStatus::try_from)
    }
}

/// A verification status value outside `0..=2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidVerificationStatus(pub i64);

impl fmt::Display for InvalidVerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid verification status: {}", self.0)
    }
}

impl std::error::Error for InvalidVerificationStatus {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum VoteDirection {
    #[serde(rename = "for", alias = "yes")]
    For,
    #[serde(rename = "against", alias = "no")]
    Against,
}

/// Channel row returned from SELECT queries
#[derive(Debug, Clone, FromRow)]
pub struct ChannelRow {
    pub id: String,
    pub name: String,
    pub votes_for: i64,
    pub votes_against: i64,
    pub verification_status: i64,
}

/// Aggregate record for one canonical channel ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[ts(type = "number")]
    pub votes_for: i64,
    #[ts(type = "number")]
    pub votes_against: i64,
    #[ts(type = "0 | 1 | 2")]
    pub verification_status: VerificationStatus,
}

impl Channel {
    /// The record a never-seen channel starts with
    pub fn new_default(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: DEFAULT_CHANNEL_NAME.to_string(),
            votes_for: 0,
            votes_against: 0,
            verification_status: VerificationStatus::Unverified,
        }
    }

    pub fn has_default_name(&self) -> bool {
        self.name == DEFAULT_CHANNEL_NAME
    }
}

impl TryFrom<ChannelRow> for Channel {
    type Error = sqlx::Error;

    fn try_from(row: ChannelRow) -> Result<Self, Self::Error> {
        let verification_status = VerificationStatus::try_from(row.verification_status)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            votes_for: row.votes_for,
            votes_against: row.votes_against,
            verification_status,
        })
    }
}

/// Result of a read-with-create-on-miss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedChannel {
    pub channel: Channel,
    /// True when this call inserted the record
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_status_numeric_serde() {
        assert_eq!(
            serde_json::to_string(&VerificationStatus::VerifiedOwned).unwrap(),
            "1"
        );
        let status: VerificationStatus = serde_json::from_str("2").unwrap();
        assert_eq!(status, VerificationStatus::VerifiedIndependent);
        assert!(serde_json::from_str::<VerificationStatus>("3").is_err());
    }

    #[test]
    fn test_verification_status_from_i64() {
        assert_eq!(
            VerificationStatus::try_from(0i64).unwrap(),
            VerificationStatus::Unverified
        );
        assert_eq!(
            VerificationStatus::try_from(-1i64),
            Err(InvalidVerificationStatus(-1))
        );
        assert_eq!(
            VerificationStatus::try_from(300i64),
            Err(InvalidVerificationStatus(300))
        );
    }

    #[test]
    fn test_vote_direction_accepts_legacy_values() {
        let d: VoteDirection = serde_json::from_str("\"yes\"").unwrap();
        assert_eq!(d, VoteDirection::For);
        let d: VoteDirection = serde_json::from_str("\"against\"").unwrap();
        assert_eq!(d, VoteDirection::Against);
        assert_eq!(serde_json::to_string(&VoteDirection::For).unwrap(), "\"for\"");
        assert!(serde_json::from_str::<VoteDirection>("\"maybe\"").is_err());
    }

    #[test]
    fn test_channel_json_shape() {
        let channel = Channel::new_default("UCabcdefghijklmnopqrAQgw");
        let json = serde_json::to_value(&channel).unwrap();
        assert_eq!(json["id"], "UCabcdefghijklmnopqrAQgw");
        assert_eq!(json["name"], "Unknown");
        assert_eq!(json["votesFor"], 0);
        assert_eq!(json["votesAgainst"], 0);
        assert_eq!(json["verificationStatus"], 0);
    }

    #[test]
    fn test_row_with_bad_status_fails_decode() {
        let row = ChannelRow {
            id: "UCabcdefghijklmnopqrAQgw".to_string(),
            name: "x".to_string(),
            votes_for: 0,
            votes_against: 0,
            verification_status: 9,
        };
        assert!(Channel::try_from(row).is_err());
    }
}
