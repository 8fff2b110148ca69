use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ParticipantId = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    /// Informational only, never converted.
    pub currency: String,
    pub paid_by: ParticipantId,
    pub participants: Vec<ParticipantId>,
    pub created_at: DateTime<Utc>,
}

/// Arguments of a new expense, before an id and timestamp are assigned.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub paid_by: ParticipantId,
    pub participants: Vec<ParticipantId>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: f64,
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
