use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::init_logging;
use crate::config::{
    DEFAULT_MAX_FILES_PER_PROJECT, DEFAULT_MAX_MESSAGES_PER_FILE, DEFAULT_MAX_PROJECTS,
    DEFAULT_RANKING_MODEL, ExtractorConfig, ScanLimits, SemanticSearchConfig,
};
use crate::extraction::{Extraction, ExtractionStatus, HistoryExtractor, select_projects};
use crate::grouping::group_by_date;
use crate::models::{DisplayMessage, MessageGroup};
use crate::parsers::MessageProfile;
use crate::search::command_ranker::DEFAULT_RANKER_PROGRAM;
use crate::search::{CommandRanker, SearchStatus, exact_search, semantic_search};
use crate::utils::terminal::sanitize_single_line;
use crate::utils::{format_path_with_tilde, get_projects_dir};

#[derive(Parser)]
#[command(name = "ai-history-extractor")]
#[command(version = "0.1.0")]
#[command(about = "Extract recent messages from Claude Code conversation history", long_about = None)]
pub struct Cli {
    /// Projects directory [default: <claude dir>/projects]
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Most recently active projects to scan
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PROJECTS)]
    pub max_projects: usize,

    /// Newest log files to scan per project
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FILES_PER_PROJECT)]
    pub max_files: usize,

    /// Newest messages kept per log file
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_MESSAGES_PER_FILE)]
    pub max_messages: usize,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List messages you sent, newest first
    Sent,
    /// List assistant replies, newest first
    Received,
    /// Show messages grouped into date sections
    Groups {
        /// Group assistant replies instead of sent messages
        #[arg(long)]
        received: bool,
    },
    /// Filter messages by text
    Search {
        query: String,
        /// Search assistant replies instead of sent messages
        #[arg(long)]
        received: bool,
        /// Re-rank by meaning through an assistant CLI, falling back to exact matching
        #[arg(long)]
        semantic: bool,
        /// Model passed to the ranking CLI
        #[arg(long, default_value = DEFAULT_RANKING_MODEL)]
        model: String,
        /// Ranking CLI executable
        #[arg(long, default_value = DEFAULT_RANKER_PROGRAM, value_name = "PROGRAM")]
        ranker: PathBuf,
    },
    /// Show which projects and log files would be scanned
    Projects,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(execute(&cli, command))
}

async fn execute(cli: &Cli, command: &Commands) -> Result<()> {
    let config = extractor_config(cli)?;

    match command {
        Commands::Sent => list_messages(cli, &config, &MessageProfile::SENT).await,
        Commands::Received => list_messages(cli, &config, &MessageProfile::RECEIVED).await,
        Commands::Groups { received } => show_groups(cli, &config, profile_for(*received)).await,
        Commands::Search { query, received, semantic, model, ranker } => {
            let ranking = semantic.then(|| RankingOptions {
                ranker: CommandRanker::new(ranker.clone()),
                config: SemanticSearchConfig { model: model.clone(), ..Default::default() },
            });
            search_messages(cli, &config, profile_for(*received), query, ranking).await
        }
        Commands::Projects => show_projects(cli, &config).await,
    }
}

fn extractor_config(cli: &Cli) -> Result<ExtractorConfig> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => get_projects_dir()?,
    };

    Ok(ExtractorConfig::new(root).with_limits(ScanLimits {
        max_projects: cli.max_projects,
        max_files_per_project: cli.max_files,
        max_messages_per_file: cli.max_messages,
    }))
}

fn profile_for(received: bool) -> &'static MessageProfile {
    if received { &MessageProfile::RECEIVED } else { &MessageProfile::SENT }
}

async fn extract(config: &ExtractorConfig, profile: &MessageProfile) -> Extraction {
    HistoryExtractor::new(config.clone()).extract(profile, &CancellationToken::new()).await
}

async fn list_messages(cli: &Cli, config: &ExtractorConfig, profile: &MessageProfile) -> Result<()> {
    let extraction = extract(config, profile).await;

    if cli.json {
        return print_json(&extraction);
    }

    print_messages(&extraction.messages);
    print_extraction_footer(&extraction);
    Ok(())
}

async fn show_groups(cli: &Cli, config: &ExtractorConfig, profile: &MessageProfile) -> Result<()> {
    let extraction = extract(config, profile).await;
    let status = extraction.status.clone();
    let groups = group_by_date(extraction.messages);

    if cli.json {
        return print_json(&GroupsOutput { status, groups: &groups });
    }

    if groups.is_empty() {
        println!("No history found");
    }
    for group in &groups {
        println!("{} ({})", group.category, group.messages.len());
        for message in &group.messages {
            println!("  {}", message_line(message));
        }
        println!();
    }
    Ok(())
}

struct RankingOptions {
    ranker: CommandRanker,
    config: SemanticSearchConfig,
}

async fn search_messages(
    cli: &Cli,
    config: &ExtractorConfig,
    profile: &MessageProfile,
    query: &str,
    ranking: Option<RankingOptions>,
) -> Result<()> {
    let extraction = extract(config, profile).await;

    let (messages, status) = match ranking {
        Some(options) => {
            let result =
                semantic_search(&extraction.messages, query, &options.ranker, &options.config)
                    .await;
            (result.items, result.status)
        }
        None => (exact_search(&extraction.messages, query), SearchStatus::Ok),
    };

    if cli.json {
        return print_json(&SearchOutput { query, status, messages: &messages });
    }

    match status {
        SearchStatus::Ok => {}
        SearchStatus::AccessRequired => {
            println!("Semantic search requires a subscription; showing exact matches");
        }
        SearchStatus::Failed => println!("Semantic search failed; showing exact matches"),
    }

    if messages.is_empty() {
        println!("No messages match {:?}", query);
    } else {
        print_messages(&messages);
    }
    Ok(())
}

async fn show_projects(cli: &Cli, config: &ExtractorConfig) -> Result<()> {
    let projects = select_projects(&config.projects_root, &config.limits, &CancellationToken::new())
        .await?;

    if cli.json {
        return print_json(&projects);
    }

    println!("Projects directory: {}", format_path_with_tilde(&config.projects_root));
    for project in &projects {
        println!();
        println!(
            "{}  (last active {})",
            sanitize_single_line(&project.activity.name),
            project.activity.most_recent_file_time.format("%Y-%m-%d %H:%M:%S")
        );
        for file in &project.files {
            println!(
                "  {}  {}",
                file.modified.format("%Y-%m-%d %H:%M:%S"),
                sanitize_single_line(&file.name)
            );
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct GroupsOutput<'a> {
    status: ExtractionStatus,
    groups: &'a [MessageGroup],
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    status: SearchStatus,
    messages: &'a [DisplayMessage],
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_messages(messages: &[DisplayMessage]) {
    for message in messages {
        println!("{}", message_line(message));
    }
}

fn message_line(message: &DisplayMessage) -> String {
    format!(
        "{:<14} {}  {}  {}",
        message.id,
        message.timestamp(),
        format_path_with_tilde(&message.message.project_path),
        sanitize_single_line(&message.preview)
    )
}

fn print_extraction_footer(extraction: &Extraction) {
    match &extraction.status {
        ExtractionStatus::Complete if extraction.is_empty() => println!("No history found"),
        ExtractionStatus::Complete => {}
        ExtractionStatus::Partial => println!(
            "{} of {} log files could not be read",
            extraction.files_failed, extraction.files_scanned
        ),
        ExtractionStatus::Unavailable { .. } => println!("No history found"),
        ExtractionStatus::Cancelled => println!("Extraction cancelled"),
    }
}
