use serde::{Deserialize, Serialize};

use super::{wire, Keyed};

// ---------------------------------------------------------------------------
// Notification: Account alert (rank drop, new review, ...)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "wire::text")]
    pub title: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub message: String,
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Keyed for Notification {
    fn key(&self) -> u64 {
        self.id
    }
}
