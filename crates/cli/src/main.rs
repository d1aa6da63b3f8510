mod cli;
mod config;

use agent::engine::ReplyService;
use agent::pipeline::ReplyPipeline;
use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, HistoryAction, InputArgs, ReplyArgs};
use config::AppConfig;
use mailgenie_core::eml;
use mailgenie_core::types::HistoryQuery;
use std::sync::Arc;
use storage::JsonHistoryStore;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_email(input: &InputArgs) -> Result<String> {
    match &input.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read email from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_service(config: &AppConfig, history: Option<Arc<JsonHistoryStore>>) -> Result<ReplyService> {
    let provider = config.ai.build_provider()?;
    let pipeline = ReplyPipeline::new(provider, Some(config.ai.detect_model.clone()))?;

    let mut service = ReplyService::new(Arc::new(pipeline), config.ai.report())
        .with_request_timeout(config.request_timeout);
    if let Some(store) = history {
        service = service.with_history(store);
    }
    Ok(service)
}

async fn run_reply(config: &AppConfig, args: ReplyArgs) -> Result<()> {
    // Reject unknown tones before any other work
    let tone = args
        .tone
        .as_deref()
        .map(ReplyService::parse_tone)
        .transpose()?;

    let email = read_email(&args.input).await?;
    let mut request = args.to_request(email);
    request.tone = tone;

    let history = match &args.user {
        Some(_) => Some(Arc::new(JsonHistoryStore::new(&config.data_dir).await?)),
        None => None,
    };
    let service = build_service(config, history)?;
    let (response, history_write) = service.generate_tracked(args.user.as_deref(), request).await?;

    if let Some(path) = &args.eml {
        let body = eml::to_eml(&response.result.reply, chrono::Utc::now())?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    if args.input.json {
        print_json(&response)?;
    } else {
        if let Some(message) = &response.message {
            eprintln!("note: {}", message);
        }
        eprintln!(
            "tone: {} (confidence {:.2})",
            response.result.detected_tone, response.result.confidence
        );
        println!("{}", response.result.reply);
    }

    // The runtime stops when main returns, so finish the history write first
    if let Some(write) = history_write {
        if let Err(e) = write.await {
            warn!("History write did not complete: {}", e);
        }
    }

    Ok(())
}

async fn run_detect(config: &AppConfig, args: InputArgs) -> Result<()> {
    let email = read_email(&args).await?;
    let service = build_service(config, None)?;
    let detection = service.detect_tone(&email).await;

    if args.json {
        print_json(&detection)?;
    } else {
        println!("{} ({:.2})", detection.tone, detection.confidence);
    }
    Ok(())
}

fn run_tones(json: bool) -> Result<()> {
    let tones = ReplyService::list_tones();
    if json {
        return print_json(&serde_json::json!({ "tones": tones }));
    }
    for tone in tones {
        println!("{:<14} {}", tone.value.to_string(), tone.description);
    }
    Ok(())
}

async fn run_config(config: &AppConfig, models: bool) -> Result<()> {
    let report = config.ai.report();
    if !models {
        return print_json(&report);
    }

    let Some(provider) = config.ai.build_provider()? else {
        bail!("{}", report.message);
    };
    let models = provider.list_models().await?;
    print_json(&serde_json::json!({ "config": report, "models": models }))
}

async fn run_history(config: &AppConfig, action: HistoryAction) -> Result<()> {
    let store = JsonHistoryStore::new(&config.data_dir).await?;

    match action {
        HistoryAction::List {
            user,
            tone,
            search,
            page,
            limit,
            json,
        } => {
            let result = store
                .query(
                    &user,
                    &HistoryQuery {
                        tone,
                        search,
                        page,
                        limit,
                    },
                )
                .await?;

            if json {
                return print_json(&result);
            }
            for item in &result.history {
                println!("{}  {}  [{}]", item.id, item.created_at, item.tone);
                println!("    {}", item.email_content.lines().next().unwrap_or_default());
            }
            println!(
                "page {}/{} ({} items)",
                result.pagination.page, result.pagination.total_pages, result.pagination.total
            );
        }
        HistoryAction::Delete { user, id } => {
            if !store.delete(&user, &id).await? {
                bail!("History item not found: {}", id);
            }
            println!("History item deleted successfully");
        }
        HistoryAction::Clear { user } => {
            store.clear(&user).await?;
            println!("History cleared for {}", user);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = AppConfig::from_env().with_data_dir(cli.data_dir);
    debug!(?config.data_dir, configured = config.ai.is_configured(), "Loaded configuration");

    match cli.command {
        Commands::Reply(args) => run_reply(&config, args).await,
        Commands::Detect(args) => run_detect(&config, args).await,
        Commands::Tones { json } => run_tones(json),
        Commands::Config { models } => run_config(&config, models).await,
        Commands::History { action } => run_history(&config, action).await,
    }
}
