use civicboard::prelude::*;
use civicboard::summary;
use clap::{Parser, Subcommand};
use serde_json::json;

/// Civic dashboard core over static municipal fixtures
#[derive(Parser, Debug)]
#[command(name = "civicboard")]
#[command(about = "Browse the municipal policy catalog and finance data")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List policies from the seeded catalog
    Policies {
        /// Sort order
        #[arg(long, default_value = "newest", value_parser = ["newest", "popularity_desc", "popularity_asc"])]
        sort: String,

        /// Case-insensitive search term
        #[arg(long, default_value = "")]
        search: String,

        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List selectable finance periods
    Periods {
        /// Time granularity
        #[arg(long, default_value = "year", value_parser = ["year", "month"])]
        granularity: String,
    },

    /// Show revenue or expenditure records for a period
    Finance {
        /// Time granularity
        #[arg(long, default_value = "year", value_parser = ["year", "month"])]
        granularity: String,

        /// Period key (e.g. 2024 or 2024-06); defaults to the most recent
        #[arg(long)]
        period: Option<String>,

        /// Which side of the ledger
        #[arg(long, default_value = "revenue", value_parser = ["revenue", "expenditure"])]
        kind: String,
    },

    /// Show fiscal health indicators for a year
    Indicators {
        #[arg(long)]
        year: i32,
    },

    /// Summarize a policy via the generative-text endpoint
    Summarize {
        /// Policy identifier from the seeded catalog
        #[arg(long)]
        id: String,

        /// Override the summarization endpoint
        #[arg(long, default_value = summary::DEFAULT_ENDPOINT)]
        endpoint: String,

        /// API key (can also use CIVICBOARD_API_KEY env var)
        #[arg(long)]
        api_key: Option<String>,
    },
}

fn seeded_store() -> anyhow::Result<PolicyStore> {
    let mut store = PolicyStore::new(StoreConfig::default());
    store.initialize(civicboard::fixtures::seed_policies()?);
    Ok(store)
}

fn run_policies(sort: &str, search: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let mut store = seeded_store()?;
    store.set_sort_order(SortOrder::from(sort));

    let matches = store.filtered(search);
    let limited = match limit {
        Some(n) => &matches[..n.min(matches.len())],
        None => &matches[..],
    };

    for policy in limited {
        let line = json!({
            "policy": policy,
            "popularity_percent": policy.popularity(),
            "popularity_tier": policy.popularity_tier(),
            "status_class": policy.status_class(),
        });
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

fn run_periods(granularity: &str) -> anyhow::Result<()> {
    let book = civicboard::fixtures::finance_book()?;
    for period in book.available_periods(Granularity::from(granularity)) {
        println!("{}", serde_json::to_string(&period)?);
    }
    Ok(())
}

fn run_finance(granularity: &str, period: Option<String>, kind: &str) -> anyhow::Result<()> {
    let book = civicboard::fixtures::finance_book()?;
    let granularity = Granularity::from(granularity);
    let period = match period {
        Some(value) => value,
        None => {
            let available = book.available_periods(granularity);
            civicboard::select_default_period(granularity, &available).value
        }
    };

    let records = book.filtered_records(FinanceKind::from(kind), granularity, &period)?;
    if records.is_empty() {
        eprintln!("No records for period {}", period);
        return Ok(());
    }
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

fn run_indicators(year: i32) -> anyhow::Result<()> {
    let book = civicboard::fixtures::finance_book()?;
    match book.indicators_for_year(year) {
        Some(indicator) => println!("{}", serde_json::to_string(indicator)?),
        None => eprintln!("No indicators recorded for {}", year),
    }
    Ok(())
}

async fn run_summarize(id: &str, endpoint: String, api_key: Option<String>) -> anyhow::Result<()> {
    let store = seeded_store()?;
    let Some(policy) = store.policies().iter().find(|p| p.id == id) else {
        return Err(anyhow::anyhow!("No policy with id {}", id));
    };

    let api_key = api_key.or_else(|| std::env::var("CIVICBOARD_API_KEY").ok());
    let summarizer = Summarizer::new(endpoint, api_key);
    let mut cell = SummaryCell::new();
    match cell.run(summarizer.summarize(policy)).await {
        civicboard::SummaryState::Ready(text) => println!("{}", text),
        civicboard::SummaryState::Failed(message) => println!("{}", message),
        _ => unreachable!("run always lands in a terminal state"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Policies {
            sort,
            search,
            limit,
        } => run_policies(&sort, &search, limit),
        Command::Periods { granularity } => run_periods(&granularity),
        Command::Finance {
            granularity,
            period,
            kind,
        } => run_finance(&granularity, period, kind.as_str()),
        Command::Indicators { year } => run_indicators(year),
        Command::Summarize {
            id,
            endpoint,
            api_key,
        } => run_summarize(&id, endpoint, api_key).await,
    }
}
