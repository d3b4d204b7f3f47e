use clap::{Args, Subcommand};
use cuentos_core::{Article, Result};

use crate::manager::{render_report, ExtractorManager};

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Extract the article text of one or more urls
    Url {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Force an extractor by name instead of dispatching on the url prefix
        #[arg(long)]
        extractor: Option<String>,
    },
    /// List available extractors
    List,
}

/// Outcome of a scraper subcommand, for callers that persist results.
#[derive(Debug, Default)]
pub struct CommandOutput {
    pub articles: Vec<Article>,
    /// Batch report in the `Texto extraído de <url>:` layout, when urls were processed.
    pub report: Option<String>,
}

pub async fn handle_command(args: ScraperArgs, manager: &ExtractorManager) -> Result<CommandOutput> {
    match args.command {
        ScraperCommands::Url { urls, extractor } => {
            let results = match extractor {
                Some(name) => {
                    manager.extractor_by_name(&name)?;
                    let mut results = Vec::with_capacity(urls.len());
                    for url in &urls {
                        results.push((url.clone(), manager.extract_named(&name, url).await));
                    }
                    results
                }
                None => manager.extract_many(&urls).await,
            };

            let report = render_report(&results);
            let mut articles = Vec::new();
            for (url, result) in results {
                match result {
                    Ok(article) => {
                        println!("✅ [{}] {} ({} chars)", article.source, url, article.extracted_text.len());
                        articles.push(article);
                    }
                    Err(e) => eprintln!("❌ {}", e),
                }
            }
            Ok(CommandOutput {
                articles,
                report: Some(report),
            })
        }
        ScraperCommands::List => {
            println!("Available extractors:");
            for extractor in manager.extractors() {
                println!(
                    "  {:<10} {:<22} {}",
                    extractor.cli_names().join(","),
                    extractor.source(),
                    extractor.url_prefix().unwrap_or("(fallback)")
                );
            }
            Ok(CommandOutput::default())
        }
    }
}
