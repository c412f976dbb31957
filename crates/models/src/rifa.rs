use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

/// A participant's claim on one or more raffle numbers, as stored
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RaffleEntry {
    // Assigned by the store on insert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub name: String,
    pub numbers: Vec<u32>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl RaffleEntry {
    pub const TABLE: &'static str = "rifas";

    pub fn new(name: String, numbers: Vec<u32>) -> Self {
        Self {
            id: None,
            name,
            numbers,
            created_at: Utc::now(),
        }
    }

    pub fn record_key(&self) -> Option<String> {
        self.id.as_ref().map(|thing| thing.id.to_string())
    }
}

// For API responses
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RaffleEntryView {
    pub id: String,
    pub name: String,
    pub numbers: Vec<u32>,
    pub created_at: DateTime<Utc>,
}

impl From<RaffleEntry> for RaffleEntryView {
    fn from(entry: RaffleEntry) -> Self {
        Self {
            id: entry.record_key().unwrap_or_default(),
            name: entry.name,
            numbers: entry.numbers,
            created_at: entry.created_at,
        }
    }
}

/// Request body for creating an entry. The web client's Portuguese field
/// names (`nome`, `numeros`) are accepted too.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateRaffleInput {
    #[serde(alias = "nome", default)]
    pub name: String,
    #[serde(alias = "numeros", default)]
    pub numbers: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RaffleSummary {
    pub purchased_count: usize,
    pub total_raised: u64,
    pub price_per_number: u64,
    pub max_number: u32,
    pub available_numbers: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaymentInfo {
    pub code: String,
}
