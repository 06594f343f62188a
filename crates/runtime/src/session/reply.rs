//! Outbound reply to a processed command.

use serde::{Deserialize, Serialize};
use tactics_core::{CommandId, GameError, MatchEvent, MatchSnapshot};

/// What the host sends back for every inbound command.
///
/// Accepted replies carry the events drained from the step plus the
/// post-step snapshot. Rejections carry the stable error code and a
/// human-readable reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    Accepted {
        command_id: CommandId,
        events: Vec<MatchEvent>,
        snapshot: MatchSnapshot,
    },
    Rejected {
        /// Echo of the inbound id; absent when the map had none.
        command_id: Option<String>,
        code: String,
        reason: String,
    },
}

impl Reply {
    pub fn rejected<E: GameError>(command_id: Option<String>, error: &E) -> Self {
        Reply::Rejected {
            command_id,
            code: error.error_code().to_owned(),
            reason: error.to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Reply::Accepted { .. })
    }

    /// Error code of a rejection.
    pub fn code(&self) -> Option<&str> {
        match self {
            Reply::Accepted { .. } => None,
            Reply::Rejected { code, .. } => Some(code),
        }
    }

    pub fn events(&self) -> &[MatchEvent] {
        match self {
            Reply::Accepted { events, .. } => events,
            Reply::Rejected { .. } => &[],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
