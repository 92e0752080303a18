use std::env;

use shopsearch_core::config::Config;
use shopsearch_pipeline::SEARCH_TOP_K;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--limit N] [--no-fallback]", args[0]);
        eprintln!("Example: {} 'running shoes' --limit 5", args[0]);
        std::process::exit(1);
    }
    let query = &args[1];
    let mut limit = SEARCH_TOP_K;
    let mut use_fallback = true;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                if let Some(l) = args.get(i + 1).and_then(|a| a.parse::<usize>().ok()) {
                    limit = l;
                    i += 1;
                } else {
                    eprintln!("Error: --limit requires a number");
                    std::process::exit(1);
                }
            }
            "--no-fallback" => use_fallback = false,
            _ => {}
        }
        i += 1;
    }

    shopsearch_cli::init_tracing();
    let config = Config::load()?;
    let engine = shopsearch_cli::build_engine(&config)?;

    let results = engine.search_with_options(query, limit, use_fallback).await?;
    for result in &results {
        println!("{}", serde_json::to_string(result)?);
    }
    Ok(())
}
