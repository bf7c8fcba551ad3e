use chrono::{DateTime, Local, NaiveDate};
use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use crate::api::blockchair::{BlockchairClient, Transaction, SATOSHIS_PER_BTC};
use crate::models::PizzaReport;
use crate::services::classifier_service::{self, PizzaError};

/// The famous pizza day, used when no date is given
pub const PIZZA_DAY: &str = "2010-05-22";

/// Max characters spent on the transaction listing (embed descriptions cap at 4096)
const LISTING_MAX_CHARS: usize = 3500;

/// Bitcoin genesis block, the earliest date worth asking about
pub fn genesis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2009, 1, 3).unwrap_or(NaiveDate::MIN)
}

/// The date one `$pizza` invocation is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PizzaRequest {
    pub date: NaiveDate,
}

impl PizzaRequest {
    /// Build a request from command arguments, defaulting to pizza day.
    /// `today` is the upper bound for the date.
    pub fn from_args(args: &[&str], today: NaiveDate) -> Result<Self, PizzaError> {
        let raw = args.first().copied().unwrap_or(PIZZA_DAY);
        let date = classifier_service::parse_date(raw)?;
        check_date_range(date, today)?;
        Ok(PizzaRequest { date })
    }

    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Turn command arguments into a request, or into the reply explaining why not
pub fn parse_request(args: &[&str], today: NaiveDate) -> Result<PizzaRequest, CreateEmbed> {
    PizzaRequest::from_args(args, today).map_err(|e| {
        tracing::info!("Rejected pizza date {:?}: {}", args.first(), e);
        create_date_error_embed(&e)
    })
}

/// Reject dates before the genesis block or after `today`
pub fn check_date_range(date: NaiveDate, today: NaiveDate) -> Result<(), PizzaError> {
    let min = genesis_date();
    if date < min || date > today {
        return Err(PizzaError::DateOutOfRange { date, min, max: today });
    }
    Ok(())
}

/// Count the pizza-like transactions among a day's batch
pub fn build_report(transactions: &[Transaction], date: &str) -> Result<PizzaReport, PizzaError> {
    let pizza_transactions = classifier_service::pizza_transactions_for_date(transactions, date)?;

    Ok(PizzaReport {
        date: classifier_service::parse_date(date)?,
        total_transactions: transactions.len(),
        pizza_transactions,
    })
}

/// Fetch the requested day and classify it.
///
/// `Ok(None)` means the fetch failed or the response carried no `data`; the
/// caller cannot tell which.
pub async fn analyze(
    client: &BlockchairClient,
    request: &PizzaRequest,
) -> Result<Option<PizzaReport>, PizzaError> {
    let date = request.date_string();

    let transactions = match client.fetch_transactions(&date).await.and_then(|batch| batch.data) {
        Some(txs) => txs,
        None => return Ok(None),
    };

    let report = build_report(&transactions, &date)?;
    tracing::info!(
        "🍕 {}: {} of {} transactions look like pizza",
        date,
        report.pizza_count(),
        report.total_transactions
    );
    Ok(Some(report))
}

/// Local wall-clock time of a transaction
fn format_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// One line per transaction: hash, time and fee.
///
/// The fee is shown as satoshis converted to BTC, while the classifier reads
/// the same field as BTC already.
pub fn format_transaction_listing(transactions: &[Transaction], max_chars: usize) -> String {
    if transactions.is_empty() {
        return "No pizza-related transactions found for this date.".to_string();
    }

    let mut listing = String::new();
    for (shown, tx) in transactions.iter().enumerate() {
        let line = format!(
            "`{}`\n🕒 {} • 💸 {:.8} BTC\n",
            tx.hash(),
            format_time(tx.time),
            tx.fee() / SATOSHIS_PER_BTC
        );

        let remaining = transactions.len() - shown;
        let tail = format!("…and {} more", remaining);
        // the last line needs no room for a tail
        let reserve = if remaining == 1 { 0 } else { tail.len() };
        if listing.len() + line.len() + reserve > max_chars {
            listing.push_str(&tail);
            return listing;
        }
        listing.push_str(&line);
    }
    listing
}

pub fn create_report_embed(report: &PizzaReport) -> CreateEmbed {
    let date = report.date.format("%Y-%m-%d").to_string();
    let listing = format_transaction_listing(&report.pizza_transactions, LISTING_MAX_CHARS);

    let mut embed = CreateEmbed::default()
        .title(format!("🍕 Analysis for {}", date))
        .description(format!("**Pizza-Related Transactions**\n{}", listing))
        .field("🍕 Estimated Pizzas", report.pizza_count().to_string(), true)
        .field("📊 Total Transactions", report.total_transactions.to_string(), true);

    if let Some(ratio) = report.pizza_ratio() {
        embed = embed.field("📈 Pizza Ratio", format!("{:.2}%", ratio), true);
    }

    if date == PIZZA_DAY {
        embed = embed.field(
            "🎯 Bitcoin Pizza Day",
            "This is the day Laszlo Hanyecz paid 10,000 BTC for two pizzas!\n\
             The actual transaction might not be detected by our heuristics as it was a special case.",
            false,
        );
    }

    embed
        .footer(CreateEmbedFooter::new("Made with ❤️ and 🍕 | Data from Blockchair API"))
        .color(0xf4a261)
}

pub fn create_fetch_failure_embed(date: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title("❌ No Data")
        .description(format!(
            "Failed to fetch data from Blockchair API for {}. This could be due to:\n\
             • API rate limiting\n\
             • Network issues\n\
             • Invalid date range\n\
             • API service disruption",
            date
        ))
        .color(0xff0000)
}

pub fn create_usage_embed() -> CreateEmbed {
    CreateEmbed::default()
        .title("🍕 Pizza Command")
        .description("Estimate how many Bitcoin transactions on a given day might have bought a pizza")
        .field("Usage", "`$pizza [YYYY-MM-DD]`", false)
        .field(
            "Examples",
            "`$pizza` (Bitcoin Pizza Day, 2010-05-22)\n\
             `$pizza 2013-12-04`",
            false,
        )
        .field(
            "Heuristics",
            "• \"pizza\" appears in the decoded script\n\
             • Fee between 0.001 and 0.01\n\
             • An output worth 0.001 to 0.1 BTC",
            false,
        )
        .field("Range", format!("{} to today", genesis_date()), false)
        .color(0x00b0f4)
}

pub fn create_date_error_embed(err: &PizzaError) -> CreateEmbed {
    create_usage_embed()
        .field("❌ Invalid Date", err.to_string(), false)
        .color(0xff0000)
}
