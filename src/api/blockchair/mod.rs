pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::BlockchairClient;
pub use models::{Output, Transaction, SATOSHIS_PER_BTC};
