//! NewsBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use newsbuddy::{
    cli::{Args, Commands, Config, Verbosity},
    doctor::Doctor,
    llm,
    logging,
    pipeline::NewsChatbot,
    repl::{DisplayManager, ReplSession},
    search::{index, ArticleSearch, ElasticsearchClient, IndexManager},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(message) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), message);
        std::process::exit(2);
    }

    let verbosity = args.verbosity();
    logging::init(verbosity);

    let config = load_config(&args)?;

    match &args.command {
        Some(Commands::Start) => run_repl(&config, verbosity).await?,
        Some(Commands::Index { file, recreate }) => {
            run_index(&config, file, *recreate, verbosity).await?
        }
        Some(Commands::Doctor) => run_doctor(config).await?,
        Some(Commands::Config) => show_config(&config, &args)?,
        None => match &args.question {
            Some(question) => ask_once(&config, question, verbosity).await?,
            None => run_repl(&config, verbosity).await?,
        },
    }

    Ok(())
}

/// File (or default) configuration with command-line overrides applied
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn build_chatbot(config: &Config) -> Result<NewsChatbot> {
    let search: Arc<dyn ArticleSearch> = Arc::new(
        ElasticsearchClient::new(&config.search).context("Failed to create search client")?,
    );
    let model = llm::from_config(config).context("Failed to create model client")?;

    info!(
        provider = model.name(),
        model = model.model(),
        index = %config.search.index,
        "pipeline ready"
    );
    Ok(NewsChatbot::from_config(config, search, model))
}

fn model_name(config: &Config) -> &str {
    match config.model.provider.as_str() {
        "ollama" => &config.model.ollama_model,
        _ => &config.model.gemini_model,
    }
}

async fn ask_once(config: &Config, question: &str, verbosity: Verbosity) -> Result<()> {
    let chatbot = build_chatbot(config)?;
    let mut display = DisplayManager::with_config(&config.display);

    if verbosity.show_progress() {
        display.start_spinner("관련 기사를 검색하고 답변을 생성하고 있습니다...");
    }
    let result = chatbot.process_query(question).await;
    display.finish_spinner();

    if verbosity.show_articles() {
        display.show_result(&result);
    } else {
        println!("{}", result.answer);
    }

    if result.is_apology() {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_repl(config: &Config, verbosity: Verbosity) -> Result<()> {
    let chatbot = build_chatbot(config)?;
    let mut repl = ReplSession::with_history(chatbot, &config.display, config.history_file())?;
    repl.set_show_progress(verbosity.show_progress());

    repl.show_welcome(
        env!("CARGO_PKG_VERSION"),
        &config.model.provider,
        model_name(config),
        &config.search.index,
    );

    repl.run().await
}

async fn run_index(
    config: &Config,
    file: &std::path::Path,
    recreate: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let (records, skipped) = index::load_records(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if skipped > 0 {
        eprintln!("{} skipped {} malformed line(s)", "Warning:".yellow().bold(), skipped);
    }

    let manager = IndexManager::new(&config.search)?;
    manager
        .create_index(recreate)
        .await
        .context("Failed to prepare index")?;

    let spinner = if verbosity.show_progress() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Syncing {} articles...", records.len()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let report = manager.sync_articles(&records).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let report = report.context("Failed to sync articles")?;

    println!(
        "{} {} indexed, {} failed (index: {})",
        "✓".green(),
        report.succeeded.to_string().green(),
        report.failed.to_string().red(),
        config.search.index
    );
    Ok(())
}

async fn run_doctor(config: Config) -> Result<()> {
    let checks = Doctor::new(config).run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

fn show_config(config: &Config, args: &Args) -> Result<()> {
    println!("\n{}\n", "NewsBuddy Configuration".bold().cyan());

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);

    println!("Verbosity: {}", args.verbosity().as_str());
    println!("History:   {}", config.history_file().display());
    Ok(())
}
