//! Interactive demonstration CLI.
//!
//! Builds a tiny in-memory sample index, takes a query name on the command
//! line (or prompts for one), and prints ranked results with a score
//! breakdown. Exists for manual smoke-testing of the engine without
//! standing up the (out of scope) HTTP layer.

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;

use watchlist_match::{
    BatchItem, BatchRequest, BatchScreener, Entity, EntityIndex, EntityType, EngineConfig,
    SearchRequest, Source, TraceRepository,
};

#[derive(Debug, Parser)]
#[command(name = "screen", about = "Screen a name against a small sample watchlist")]
struct Args {
    /// Name to screen. If omitted, you will be prompted for one.
    name: Option<String>,

    /// Minimum overall score required to appear in the results.
    #[arg(long)]
    min_match: Option<f64>,

    /// Maximum number of results to print.
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

fn sample_index() -> Arc<EntityIndex> {
    let index = EntityIndex::new();
    index
        .replace_all(vec![
            Entity::new("sdn-1", "MADURO MOROS, Nicolas", EntityType::Person, Source::OfacSdn)
                .with_source_id("18914")
                .with_alt_names(vec!["Nicolas Maduro".into()])
                .prepare(),
            Entity::new("sdn-2", "Hugo Rafael Chavez Frias", EntityType::Person, Source::OfacSdn)
                .with_source_id("11281")
                .prepare(),
            Entity::new("eu-1", "Acme Trading Company LLC", EntityType::Business, Source::EuConsolidated)
                .with_source_id("EU-4471")
                .with_alt_names(vec!["Acme Holdings".into()])
                .prepare(),
            Entity::new("uk-1", "Joaquin Guzman Loera", EntityType::Person, Source::UkConsolidated)
                .with_source_id("UK-998")
                .with_alt_names(vec!["El Chapo".into()])
                .prepare(),
        ])
        .expect("sample entities are always prepared");
    Arc::new(index)
}

fn prompt_for_name() -> String {
    print!("Enter a name to screen: ");
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let name = args.name.unwrap_or_else(prompt_for_name);
    if name.is_empty() {
        eprintln!("no name given, nothing to screen");
        std::process::exit(1);
    }

    let index = sample_index();
    let config = EngineConfig::default();
    let traces = Arc::new(TraceRepository::default());
    let screener = BatchScreener::new(index, config, traces);

    let mut request = SearchRequest::new(name.clone());
    request.min_match = args.min_match;
    request.limit = args.limit;

    let batch = BatchRequest {
        items: vec![BatchItem {
            request_id: "cli".into(),
            request,
        }],
        trace: false,
    };

    let response = match screener.screen(&batch) {
        Ok(response) => response,
        Err(err) => {
            eprintln!("screening failed: {err}");
            std::process::exit(1);
        }
    };

    let item = &response.items[0];
    println!("Screening \"{name}\" against the sample watchlist:\n");

    if item.results.is_empty() {
        println!("No matches at or above the configured threshold.");
        return;
    }

    for (rank, result) in item.results.iter().enumerate() {
        println!(
            "#{:<2} {:<32} source={:?} id={:<10} overall={:.3}",
            rank + 1,
            result.matched_name,
            result.source,
            result.source_id,
            result.overall
        );
        println!(
            "     name={:.2} alt_name={:.2} gov_id={:.2} crypto={:.2} contact={:.2} address={:.2} date={:.2}",
            result.breakdown.name,
            result.breakdown.alt_name,
            result.breakdown.government_id,
            result.breakdown.crypto,
            result.breakdown.contact,
            result.breakdown.address,
            result.breakdown.date,
        );
    }
}
