use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Connected,
    Disconnected,
}

impl ClientStatus {
    /// Wire name exchanged over the RPC boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusError {
    pub value: String,
}

impl std::fmt::Display for UnknownStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown client status: {:?}", self.value)
    }
}

impl std::error::Error for UnknownStatusError {}

impl FromStr for ClientStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connected" => Ok(Self::Connected),
            "disconnected" => Ok(Self::Disconnected),
            other => Err(UnknownStatusError {
                value: other.to_string(),
            }),
        }
    }
}

/// In-memory `client id -> status` map shared by every in-flight call.
///
/// A single async guard serializes all reads and writes. Nothing awaits while
/// the guard is held, so dropping a call future mid-way cannot leave a
/// partially applied write behind.
#[derive(Debug, Default)]
pub struct StatusStore {
    statuses: Mutex<BTreeMap<String, ClientStatus>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, client_id: &str, status: ClientStatus) {
        let mut statuses = self.statuses.lock().await;
        statuses.insert(client_id.to_string(), status);
    }

    pub async fn get(&self, client_id: &str) -> Option<ClientStatus> {
        self.statuses.lock().await.get(client_id).copied()
    }

    /// Point-in-time copy of every tracked client.
    pub async fn get_all(&self) -> BTreeMap<String, ClientStatus> {
        self.statuses.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.statuses.lock().await.len()
    }
}
