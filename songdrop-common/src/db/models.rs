//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder used when a patron submits without a name
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Lifecycle state of a song request.
///
/// `Pending` requests participate in queue ordering. `Played` and `Skipped`
/// are terminal: once a request leaves `Pending` its `display_order` is
/// vestigial and no further transition is allowed, except the idempotent
/// same-state repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Played,
    Skipped,
}

impl RequestStatus {
    /// Column value as stored in the `requests` table
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Played => "played",
            RequestStatus::Skipped => "skipped",
        }
    }

    /// Parse a column value; unknown strings are a storage-level fault
    pub fn parse(s: &str) -> Option<RequestStatus> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "played" => Some(RequestStatus::Played),
            "skipped" => Some(RequestStatus::Skipped),
            _ => None,
        }
    }

    /// Whether this state admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Played | RequestStatus::Skipped)
    }

    /// Whether a transition from `self` to `target` is permitted.
    ///
    /// Transitions are monotonic: `pending` may move to either terminal
    /// state, a terminal state may only "move" to itself (idempotent
    /// repeat). `skipped -> played` and `played -> skipped` are conflicts.
    pub fn can_become(&self, target: RequestStatus) -> bool {
        match self {
            RequestStatus::Pending => target.is_terminal(),
            _ => *self == target,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patron's song request - the sole entity of the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRequest {
    pub id: Uuid,
    /// Display name of the requester; never empty (normalized to "Anonymous")
    pub requester_name: String,
    pub song_title: String,
    pub status: RequestStatus,
    /// Rank among pending requests; ascending sort defines queue position
    pub display_order: i64,
    /// One-time payment correlation token; unique across all requests
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_column_value() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Played,
            RequestStatus::Skipped,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("queued"), None);
    }

    #[test]
    fn pending_may_reach_either_terminal_state() {
        assert!(RequestStatus::Pending.can_become(RequestStatus::Played));
        assert!(RequestStatus::Pending.can_become(RequestStatus::Skipped));
        assert!(!RequestStatus::Pending.can_become(RequestStatus::Pending));
    }

    #[test]
    fn terminal_states_only_repeat_themselves() {
        assert!(RequestStatus::Played.can_become(RequestStatus::Played));
        assert!(!RequestStatus::Played.can_become(RequestStatus::Skipped));
        assert!(!RequestStatus::Played.can_become(RequestStatus::Pending));

        assert!(RequestStatus::Skipped.can_become(RequestStatus::Skipped));
        assert!(!RequestStatus::Skipped.can_become(RequestStatus::Played));
        assert!(!RequestStatus::Skipped.can_become(RequestStatus::Pending));
    }
}
