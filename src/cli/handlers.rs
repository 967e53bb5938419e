//! Command handlers
//!
//! Each handler returns a process exit code. User-facing hints go to stderr;
//! structured output goes to stdout so it can be piped.

use std::fs;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use super::commands::{GenerateArgs, HealthArgs, PagesCommand, SearchArgs, StrategyArg};
use super::output::OutputFormatter;
use crate::config::PageforgeConfig;
use crate::pipeline::{
    BusinessData, PipelineEvent, PipelineOptions, PipelineOrchestrator,
};
use crate::places::PlaceGateway;
use crate::store::{PageStore, StoreError};

pub async fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    let business = match load_business(args) {
        Ok(b) => b,
        Err(message) => {
            error!("{}", message);
            return 1;
        }
    };
    info!(business = %business.name, "starting page generation");

    let config = PageforgeConfig::default();
    let gateway = match config.create_gateway() {
        Ok(g) => g,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("\nSet PAGEFORGE_API_KEY (and optionally PAGEFORGE_ENDPOINT, PAGEFORGE_MODEL).");
            return 1;
        }
    };

    let mut options = match args.strategy {
        StrategyArg::Thorough => PipelineOptions::thorough(),
        StrategyArg::Fast => PipelineOptions::fast(),
    };
    if args.no_critique {
        options.critique = false;
    }
    if let Some(ref requirements) = args.requirements {
        options = options.with_requirements(requirements.clone());
    }

    let orchestrator = PipelineOrchestrator::new(gateway, options);

    let show_bar = !quiet && args.output.is_some();
    let content = if show_bar {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut stream = orchestrator.generate_with_progress(business.clone());
        let mut outcome = None;
        while let Some(event) = stream.next().await {
            match event {
                PipelineEvent::Progress(progress) => {
                    bar.set_position(u64::from(progress.progress));
                    bar.set_message(progress.message);
                }
                PipelineEvent::Completed(content) => {
                    bar.finish_with_message("done");
                    outcome = Some(Ok(*content));
                }
                PipelineEvent::Failed(message) => {
                    bar.abandon_with_message("failed");
                    outcome = Some(Err(message));
                }
            }
        }
        match outcome {
            Some(Ok(content)) => content,
            Some(Err(message)) => {
                error!("Generation failed: {}", message);
                return 1;
            }
            None => {
                error!("Generation ended without a result");
                return 1;
            }
        }
    } else {
        match orchestrator.generate(&business).await {
            Ok(content) => content,
            Err(e) => {
                error!("Generation failed: {}", e);
                return 1;
            }
        }
    };

    if let Some(ref path) = args.output {
        if let Err(e) = fs::write(path, &content.html_document) {
            error!("Failed to write {}: {}", path.display(), e);
            return 1;
        }
        if !quiet {
            println!("Wrote {}", path.display());
        }
    }

    if args.save {
        match PageStore::open(&config.store_dir) {
            Ok(store) => match store.save(business, content.clone()) {
                Ok(id) => {
                    if !quiet {
                        println!("Saved page {}", id);
                    }
                }
                Err(e) => {
                    error!("Failed to save page: {}", e);
                    return 1;
                }
            },
            Err(e) => {
                error!("Failed to open page store: {}", e);
                return 1;
            }
        }
    }

    if args.output.is_none() {
        let formatter = OutputFormatter::new(args.format.into());
        match formatter.format_content(&content) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to format output: {}", e);
                return 1;
            }
        }
    }

    0
}

pub async fn handle_search(args: &SearchArgs) -> i32 {
    let config = PageforgeConfig::default();
    let gateway = match config.create_place_gateway() {
        Some(g) => g,
        None => {
            error!("Place search is not configured");
            eprintln!("\nSet PAGEFORGE_PLACES_ENDPOINT (and PAGEFORGE_PLACES_API_KEY if it differs from PAGEFORGE_API_KEY).");
            return 1;
        }
    };

    debug!(query = %args.query, "running place search");
    let places = match gateway.search(&args.query).await {
        Ok(places) => places,
        Err(e) => {
            error!("Search failed: {}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_places(&places) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            error!("Failed to format search results: {}", e);
            1
        }
    }
}

pub async fn handle_pages(command: &PagesCommand) -> i32 {
    let config = PageforgeConfig::default();
    let store = match PageStore::open(&config.store_dir) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open page store: {}", e);
            return 1;
        }
    };

    match command {
        PagesCommand::List { format } => {
            let pages = match store.list_all() {
                Ok(pages) => pages,
                Err(e) => {
                    error!("Failed to list pages: {}", e);
                    return 1;
                }
            };
            let formatter = OutputFormatter::new((*format).into());
            match formatter.format_pages(&pages) {
                Ok(text) => {
                    println!("{}", text);
                    0
                }
                Err(e) => {
                    error!("Failed to format page list: {}", e);
                    1
                }
            }
        }
        PagesCommand::Show {
            id,
            html_only,
            format,
        } => {
            let page = match store.get(id) {
                Ok(page) => page,
                Err(StoreError::NotFound { .. }) => {
                    error!("No page with id {}", id);
                    return 1;
                }
                Err(e) => {
                    error!("Failed to load page: {}", e);
                    return 1;
                }
            };
            if *html_only {
                println!("{}", page.content.html_document);
                return 0;
            }
            let formatter = OutputFormatter::new((*format).into());
            match formatter.format_page(&page) {
                Ok(text) => {
                    println!("{}", text);
                    0
                }
                Err(e) => {
                    error!("Failed to format page: {}", e);
                    1
                }
            }
        }
        PagesCommand::Delete { id } => match store.delete(id) {
            Ok(()) => {
                println!("Deleted page {}", id);
                0
            }
            Err(StoreError::NotFound { .. }) => {
                error!("No page with id {}", id);
                1
            }
            Err(e) => {
                error!("Failed to delete page: {}", e);
                1
            }
        },
    }
}

pub async fn handle_health(args: &HealthArgs) -> i32 {
    let config = PageforgeConfig::default();
    let gateway = match config.create_gateway() {
        Ok(g) => g,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("\nSet PAGEFORGE_API_KEY to check endpoint health.");
            return 1;
        }
    };

    let healthy = match gateway.health_check().await {
        Ok(reachable) => reachable,
        Err(e) => {
            debug!("Health check failed: {}", e);
            false
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_health("openai", &config.model, healthy) {
        Ok(text) => {
            println!("{}", text);
            if healthy {
                0
            } else {
                1
            }
        }
        Err(e) => {
            error!("Failed to format health status: {}", e);
            1
        }
    }
}

fn load_business(args: &GenerateArgs) -> Result<BusinessData, String> {
    if let Some(ref path) = args.input {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        return serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid business data in {}: {}", path.display(), e));
    }

    match (&args.name, &args.category, &args.address, &args.phone) {
        (Some(name), Some(category), Some(address), Some(phone)) => {
            let mut business = BusinessData::minimal(name, category, address, phone);
            if let Some(ref description) = args.description {
                business.description = description.clone();
            }
            Ok(business)
        }
        _ => Err(
            "Business data incomplete: pass --input FILE, or all of --name, --category, --address and --phone"
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;

    fn generate_args() -> GenerateArgs {
        GenerateArgs {
            input: None,
            name: None,
            category: None,
            address: None,
            phone: None,
            description: None,
            strategy: StrategyArg::Thorough,
            requirements: None,
            no_critique: false,
            output: None,
            save: false,
            format: OutputFormatArg::Human,
        }
    }

    #[test]
    fn test_load_business_requires_all_flags() {
        let mut args = generate_args();
        args.name = Some("Shop".to_string());
        assert!(load_business(&args).is_err());

        args.category = Some("Retail".to_string());
        args.address = Some("1 Ave".to_string());
        args.phone = Some("+1 555".to_string());
        let business = load_business(&args).unwrap();
        assert_eq!(business.name, "Shop");
    }

    #[test]
    fn test_load_business_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biz.json");
        std::fs::write(
            &path,
            r#"{"name":"Cafe","category":"Cafe","address":"2 St","phone":"+1 555"}"#,
        )
        .unwrap();

        let mut args = generate_args();
        args.input = Some(path);
        let business = load_business(&args).unwrap();
        assert_eq!(business.name, "Cafe");
        assert!(business.description.is_empty());
    }

    #[test]
    fn test_load_business_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biz.json");
        std::fs::write(&path, "not json").unwrap();

        let mut args = generate_args();
        args.input = Some(path);
        assert!(load_business(&args).is_err());
    }
}
