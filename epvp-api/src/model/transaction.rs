use crate::model::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Direction filter of the transactions API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionFilter {
    #[default]
    All,
    Received,
    Sent,
}

impl TransactionFilter {
    pub(crate) fn as_query(self) -> &'static str {
        match self {
            TransactionFilter::All => "all",
            TransactionFilter::Received => "received",
            TransactionFilter::Sent => "sent",
        }
    }
}

/// An elite*gold transfer between two members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    pub id: u64,
    pub sender: User,
    pub receiver: User,
    pub amount: u64,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Whether `user_id` is on the receiving side
    pub fn received_by(&self, user_id: u64) -> bool {
        self.receiver.id == user_id
    }
}

/// Record as served by `theblackmarket/api/transactions.php`
#[derive(Debug, Deserialize)]
struct RawTransaction {
    #[serde(rename = "eg_transactionid", deserialize_with = "number")]
    id: u64,
    #[serde(rename = "eg_fromid", deserialize_with = "number")]
    from_id: u64,
    #[serde(rename = "eg_fromusername")]
    from_name: String,
    #[serde(rename = "eg_toid", deserialize_with = "number")]
    to_id: u64,
    #[serde(rename = "eg_tousername")]
    to_name: String,
    #[serde(deserialize_with = "number")]
    amount: u64,
    #[serde(default)]
    reason: String,
    #[serde(deserialize_with = "number")]
    dateline: u64,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = String;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let timestamp = i64::try_from(raw.dateline).map_err(|e| e.to_string())?;
        let created_at = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| format!("timestamp out of range: {}", raw.dateline))?;
        Ok(Transaction {
            id: raw.id,
            sender: User::new(raw.from_id, raw.from_name),
            receiver: User::new(raw.to_id, raw.to_name),
            amount: raw.amount,
            note: raw.reason,
            created_at,
        })
    }
}

/// The API encodes numbers as strings; accept both forms
fn number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(u64),
        Text(String),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        Number::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
