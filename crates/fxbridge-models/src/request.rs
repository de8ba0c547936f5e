use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one fetch. `generation` increases monotonically per coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId {
    pub generation: u64,
    pub id: Uuid,
}

impl RequestId {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            id: Uuid::new_v4(),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.generation, self.id)
    }
}

/// Lifecycle of a single query request.
///
/// `Idle -> RequestWritten -> Polling -> ResultAvailable -> Consumed`.
/// A coordinator returns to `Idle` once a request finishes, whatever the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    RequestWritten,
    Polling,
    ResultAvailable,
    Consumed,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestState::Idle => "idle",
            RequestState::RequestWritten => "request written",
            RequestState::Polling => "waiting for result",
            RequestState::ResultAvailable => "result available",
            RequestState::Consumed => "consumed",
        };
        f.write_str(s)
    }
}
