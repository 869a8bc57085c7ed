//! Find text in a plain-text document
//!
//! Searches a UTF-8 text file whose pages are separated by form feeds and
//! prints every match once, in document order from the start page.
//!
//! Usage:
//!   cargo run --release --bin find_in_text -- notes.txt coffee
//!   cargo run --release --bin find_in_text -- notes.txt cat dog --entire-word --json
//!   RUST_LOG=debug cargo run --bin find_in_text -- notes.txt "crème brûlée" --start-page 3

use pdf_finder::config::FindOptions;
use pdf_finder::document::TextDocument;
use pdf_finder::search::{Match, SearchSession};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

struct FindConfig {
    path: PathBuf,
    terms: Vec<String>,
    options: FindOptions,
    start_page: usize,
    json: bool,
}

impl FindConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut path = None;
        let mut terms = Vec::new();
        let mut options = FindOptions::default();
        let mut start_page = 0;
        let mut json = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--case-sensitive" => {
                    options.case_sensitive = true;
                },
                "--entire-word" => {
                    options.entire_word = true;
                },
                "--start-page" => {
                    i += 1;
                    start_page = args
                        .get(i)
                        .and_then(|s| s.parse().ok())
                        .ok_or("--start-page needs a page index")?;
                },
                "--json" => {
                    json = true;
                },
                arg if path.is_none() => {
                    path = Some(PathBuf::from(arg));
                },
                arg => terms.push(arg.to_string()),
            }
            i += 1;
        }

        let path = path.ok_or("missing input file")?;
        if terms.is_empty() {
            return Err("missing search term".to_string());
        }
        Ok(Self {
            path,
            terms,
            options,
            start_page,
            json,
        })
    }
}

#[derive(Serialize)]
struct Hit {
    #[serde(flatten)]
    found: Match,
    text: String,
}

async fn collect_hits(session: &SearchSession) -> Vec<Hit> {
    let mut hits: Vec<Hit> = Vec::new();
    while let Some(found) = session.find_next().await {
        if hits.iter().any(|h| h.found == found) {
            break;
        }
        let text = match session.page_text(found.page_index).await {
            Ok(page) => found.original_text(&page.raw_text).to_string(),
            Err(_) => String::new(),
        };
        hits.push(Hit { found, text });
    }
    hits
}

async fn run(config: FindConfig) -> Result<(), Box<dyn std::error::Error>> {
    let doc = TextDocument::open(&config.path)?;
    let session = SearchSession::with_document(Arc::new(doc));
    session.set_query(config.terms.clone(), config.options)?;
    if config.start_page > 0 {
        session.set_start_page(config.start_page)?;
    }
    session.preload().await;

    let hits = collect_hits(&session).await;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    for hit in &hits {
        println!(
            "page {:>4}  {:>6}..{:<6}  {:?}",
            hit.found.page_index + 1,
            hit.found.original_begin,
            hit.found.original_end,
            hit.text
        );
    }
    println!(
        "{} match(es) in {} page(s) of {}",
        hits.len(),
        session.page_count(),
        config.path.display()
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let config = match FindConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: find_in_text <file> <term>... [--case-sensitive] [--entire-word] [--start-page N] [--json]"
            );
            process::exit(2);
        },
    };

    if let Err(e) = run(config).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
