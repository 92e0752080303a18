use std::env;

use shopsearch_core::config::Config;
use shopsearch_core::types::SearchResult;
use shopsearch_pipeline::ollama::{OllamaGenerator, DEFAULT_BASE_URL, DEFAULT_MODEL};
use shopsearch_pipeline::{Pipeline, Stage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query>", args[0]);
        eprintln!("Example: {} 'comfortable running shoes'", args[0]);
        std::process::exit(1);
    }
    let query = &args[1];

    shopsearch_cli::init_tracing();
    let config = Config::load()?;
    let engine = shopsearch_cli::build_engine(&config)?;

    let base_url = config.get_or::<String>("ollama_url", DEFAULT_BASE_URL.to_string());
    let model = config.get_or::<String>("ollama_model", DEFAULT_MODEL.to_string());
    let generator = OllamaGenerator::new(&base_url, &model)?;
    let pipeline = Pipeline::new(engine, Box::new(generator));

    println!("🛒 shopsearch-assist\n====================");
    println!("Query: {}", query);

    // Render each stage as soon as it completes.
    pipeline
        .run_with_observer(query, |stage, state| match stage {
            Stage::Search => {
                println!("\n🔍 Found {} results:", state.search_results.len());
                for (i, result) in state.search_results.iter().enumerate() {
                    print_result(i, result);
                }
            }
            Stage::Generate => {
                if let Some(turn) = state.messages.last() {
                    println!("\n💬 Assistant:\n{}", turn.content);
                }
            }
        })
        .await?;

    Ok(())
}

fn print_result(i: usize, result: &SearchResult) {
    if result.is_external() {
        println!("\n  {}. 🌐 {}", i + 1, result.name());
        if let Some(source) = result.source() {
            println!("     🔗 Source: {}", source);
        }
        println!("     📝 {}", result.description());
    } else {
        println!("\n  {}. {}  (${})", i + 1, result.name(), result.price_display());
        println!("     📝 {}", result.description());
    }
}
