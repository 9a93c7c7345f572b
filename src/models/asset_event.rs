use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An asset movement record as returned by `/audit/asset-events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEvent {
    pub id: i64,
    pub asset_id: i64,
    pub asset_tag: String,
    pub event_type: AssetEventType,
    #[serde(default)]
    pub from_user_id: Option<i64>,
    #[serde(default)]
    pub to_user_id: Option<i64>,
    #[serde(default)]
    pub from_location_id: Option<i64>,
    #[serde(default)]
    pub to_location_id: Option<i64>,
    #[serde(default)]
    pub actor_user_id: Option<i64>,
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub from_user_name: Option<String>,
    #[serde(default)]
    pub to_user_name: Option<String>,
    #[serde(default)]
    pub actor_user_name: Option<String>,
    #[serde(default)]
    pub from_location_name: Option<String>,
    #[serde(default)]
    pub to_location_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetEventType {
    Create,
    Assign,
    Return,
    Update,
    Move,
    /// Unrecognised wire name, kept as sent.
    Other(String),
}

impl AssetEventType {
    pub const ALL: [AssetEventType; 5] = [
        AssetEventType::Create,
        AssetEventType::Assign,
        AssetEventType::Return,
        AssetEventType::Update,
        AssetEventType::Move,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AssetEventType::Create => "CREATE",
            AssetEventType::Assign => "ASSIGN",
            AssetEventType::Return => "RETURN",
            AssetEventType::Update => "UPDATE",
            AssetEventType::Move => "MOVE",
            AssetEventType::Other(s) => s,
        }
    }

    pub fn label(&self) -> String {
        self.as_str().to_string()
    }
}

impl fmt::Display for AssetEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AssetEventType {
    fn from(s: String) -> Self {
        match Self::ALL.into_iter().find(|t| t.as_str() == s) {
            Some(known) => known,
            None => AssetEventType::Other(s),
        }
    }
}

impl From<AssetEventType> for String {
    fn from(t: AssetEventType) -> Self {
        match t {
            AssetEventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for AssetEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("Unknown asset event type: {s}"))
    }
}
