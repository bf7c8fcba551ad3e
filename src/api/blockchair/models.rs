use chrono::NaiveDateTime;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Number of satoshis in one bitcoin
pub const SATOSHIS_PER_BTC: f64 = 100_000_000.0;

/// Response body of the transactions endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionBatch {
    /// Missing when the explorer answers with an error payload under a 2xx status
    #[serde(default)]
    pub data: Option<Vec<Transaction>>,
}

/// A single transaction record as returned by Blockchair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub hash: Option<String>,
    /// Seconds since the Unix epoch
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub time: i64,
    /// Unit is not normalized: the explorer reports satoshis, the fee heuristic reads it as BTC
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub decoded_script: Option<String>,
    /// A `null` list reads as empty, `null` entries are skipped
    #[serde(default, deserialize_with = "deserialize_outputs")]
    pub outputs: Vec<Output>,
}

impl Transaction {
    pub fn fee(&self) -> f64 {
        self.fee.unwrap_or(0.0)
    }

    pub fn decoded_script(&self) -> &str {
        self.decoded_script.as_deref().unwrap_or("")
    }

    pub fn hash(&self) -> &str {
        self.hash.as_deref().unwrap_or("Unknown")
    }
}

/// Transaction output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Amount in satoshis
    #[serde(default, deserialize_with = "deserialize_satoshis")]
    pub value: i64,
}

impl Output {
    pub fn value_btc(&self) -> f64 {
        self.value as f64 / SATOSHIS_PER_BTC
    }
}

/// Accepts a Unix timestamp or Blockchair's `YYYY-MM-DD HH:MM:SS` (UTC) string.
/// Anything else collapses to 0.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Seconds(i64),
        Fractional(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let seconds = match Option::<RawTime>::deserialize(deserializer)? {
        Some(RawTime::Seconds(secs)) => secs,
        Some(RawTime::Fractional(secs)) => secs as i64,
        Some(RawTime::Text(text)) => parse_time_text(&text).unwrap_or(0),
        Some(RawTime::Other(_)) | None => 0,
    };
    Ok(seconds)
}

fn deserialize_outputs<'de, D>(deserializer: D) -> Result<Vec<Output>, D::Error>
where
    D: Deserializer<'de>,
{
    let outputs = Option::<Vec<Option<Output>>>::deserialize(deserializer)?;
    Ok(outputs.unwrap_or_default().into_iter().flatten().collect())
}

/// Integer or float satoshis; `null` and anything else read as 0
fn deserialize_satoshis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Whole(i64),
        Fractional(f64),
        Other(IgnoredAny),
    }

    let value = match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Whole(sats)) => sats,
        Some(RawAmount::Fractional(sats)) => sats as i64,
        Some(RawAmount::Other(_)) | None => 0,
    };
    Ok(value)
}

fn parse_time_text(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(secs) = text.parse::<i64>() {
        return Some(secs);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Why a fetch against the explorer failed
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// 429 Too Many Requests
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-2xx statuses
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
