//! Date filtering and the "might be a pizza" heuristic.

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;
use crate::api::blockchair::{Output, Transaction};

/// Fee window, read from the raw `fee` field with no unit conversion
const PIZZA_FEE_MIN: f64 = 0.001;
const PIZZA_FEE_MAX: f64 = 0.01;

/// Output window in BTC
const PIZZA_OUTPUT_MIN_BTC: f64 = 0.001;
const PIZZA_OUTPUT_MAX_BTC: f64 = 0.1;

const PIZZA_KEYWORD: &str = "pizza";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PizzaError {
    #[error("Date must be in YYYY-MM-DD format (got '{0}')")]
    InvalidDateFormat(String),
    #[error("Date {date} is outside the supported range {min} to {max}")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate, PizzaError> {
    let bytes = date.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_shaped {
        return Err(PizzaError::InvalidDateFormat(date.to_string()));
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| PizzaError::InvalidDateFormat(date.to_string()))
}

/// Calendar date of a Unix timestamp in the local timezone
pub fn local_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&Local).date_naive())
}

/// Keep the transactions whose local date is `date`, in input order
pub fn filter_by_date(transactions: &[Transaction], date: &str) -> Result<Vec<Transaction>, PizzaError> {
    let target = parse_date(date)?;

    Ok(transactions
        .iter()
        .filter(|tx| local_date(tx.time) == Some(target))
        .cloned()
        .collect())
}

/// Whether a transaction looks like it could have paid for a pizza.
///
/// True when any of these holds:
/// - the decoded script mentions "pizza" (any case)
/// - the raw fee lies in `[0.001, 0.01]`
/// - some output is worth between 0.001 and 0.1 BTC
pub fn is_pizza_like(tx: &Transaction) -> bool {
    mentions_pizza(tx) || has_pizza_sized_fee(tx) || tx.outputs.iter().any(is_pizza_sized_output)
}

fn mentions_pizza(tx: &Transaction) -> bool {
    tx.decoded_script().to_lowercase().contains(PIZZA_KEYWORD)
}

fn has_pizza_sized_fee(tx: &Transaction) -> bool {
    (PIZZA_FEE_MIN..=PIZZA_FEE_MAX).contains(&tx.fee())
}

fn is_pizza_sized_output(output: &Output) -> bool {
    (PIZZA_OUTPUT_MIN_BTC..=PIZZA_OUTPUT_MAX_BTC).contains(&output.value_btc())
}

/// Pizza-like transactions on `date`, in input order
pub fn pizza_transactions_for_date(
    transactions: &[Transaction],
    date: &str,
) -> Result<Vec<Transaction>, PizzaError> {
    let mut on_date = filter_by_date(transactions, date)?;
    on_date.retain(is_pizza_like);
    Ok(on_date)
}
