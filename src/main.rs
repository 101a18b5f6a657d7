//! Devstory - turn a code project into a publishable Medium article.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devstory::workflow::{MAX_TOPIC_COUNT, MIN_TOPIC_COUNT};
use devstory::{ArticleStore, ClaudeCli, Config, Gateway, Orchestrator, Topic};

/// Turn a code project into a publishable Medium article
#[derive(Parser)]
#[command(name = "devstory")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project and write an article (full pipeline)
    Run {
        /// Local project directory or remote git URL
        path: String,

        /// Article language (en, tr)
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Number of topics to generate
        #[arg(short = 'n', long, default_value_t = 5)]
        topic_count: usize,

        /// Select a topic by index (0-based) instead of prompting
        #[arg(short, long)]
        topic_index: Option<i64>,

        /// Save the article markdown to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after topic generation, skip article writing
        #[arg(long)]
        dry_run: bool,

        /// Per-call generation timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 8765)]
        port: u16,
    },

    /// Browse the article history
    Articles {
        #[command(subcommand)]
        operation: ArticlesOperation,
    },

    /// Check that the external generation CLI and data dir are usable
    Doctor,
}

#[derive(Subcommand)]
enum ArticlesOperation {
    /// List saved articles, newest first
    List,

    /// Print one article's markdown
    Show {
        /// Article id
        id: String,
    },

    /// Delete an article
    Delete {
        /// Article id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = Config::load();

    match cli.command {
        Commands::Run { path, language, topic_count, topic_index, output, dry_run, timeout_secs } => {
            let mut config = config;
            if let Some(secs) = timeout_secs.filter(|s| *s > 0) {
                config.generation_timeout = std::time::Duration::from_secs(secs);
            }
            let orchestrator = build_orchestrator(&config)?;
            cmd_run(&orchestrator, &path, &language, topic_count, topic_index, output, dry_run)
                .await
        }
        Commands::Serve { host, port } => {
            let orchestrator = Arc::new(build_orchestrator(&config)?);
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            devstory::api::serve(addr, orchestrator).await
        }
        Commands::Articles { operation } => {
            let store = ArticleStore::open(config.articles_path())?;
            cmd_articles(&store, operation)
        }
        Commands::Doctor => cmd_doctor(&config),
    }
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let provider = ClaudeCli::new(config.claude_bin.clone());
    let gateway = Gateway::new(Box::new(provider), config.generation_timeout);
    let store = Arc::new(ArticleStore::open(config.articles_path())?);
    Ok(Orchestrator::new(gateway, store))
}

async fn cmd_run(
    orchestrator: &Orchestrator,
    path: &str,
    language: &str,
    topic_count: usize,
    topic_index: Option<i64>,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    if !(MIN_TOPIC_COUNT..=MAX_TOPIC_COUNT).contains(&topic_count) {
        anyhow::bail!("topic count must be between {MIN_TOPIC_COUNT} and {MAX_TOPIC_COUNT}");
    }

    println!("Analyzing {path}...");
    let (session_id, summary) = orchestrator.analyze(path).await?;

    println!("\nProject: {}", summary.name);
    println!("  Files: {}", summary.total_files);
    println!("  Lines: {}", summary.total_lines);
    if let Some(lang) = &summary.primary_language {
        println!("  Primary language: {lang}");
    }
    if !summary.project_types.is_empty() {
        println!("  Project types: {}", summary.project_types.join(", "));
    }
    if !summary.frameworks.is_empty() {
        println!("  Frameworks: {}", summary.frameworks.join(", "));
    }
    if !summary.dependencies.is_empty() {
        let preview: Vec<&str> =
            summary.dependencies.iter().take(10).map(String::as_str).collect();
        let extra = summary.dependencies.len().saturating_sub(10);
        if extra > 0 {
            println!("  Dependencies: {} (+{extra} more)", preview.join(", "));
        } else {
            println!("  Dependencies: {}", preview.join(", "));
        }
    }

    println!("\nGenerating topic ideas...");
    let topics = orchestrator.generate_topics(&session_id, topic_count, language).await?;
    if topics.is_empty() {
        anyhow::bail!("no topics were generated");
    }
    print_topics(&topics);

    if dry_run {
        println!("--dry-run: stopping after topic generation.");
        return Ok(());
    }

    let index = match topic_index {
        Some(index) => index,
        None => prompt_topic_index(topics.len())?,
    };
    let chosen = usize::try_from(index)
        .ok()
        .and_then(|i| topics.get(i))
        .ok_or_else(|| anyhow::anyhow!("topic index {index} out of range (0-{})", topics.len() - 1))?;
    println!("\nSelected: {}\n", chosen.title);

    println!("Writing article (this can take a few minutes)...");
    let article = orchestrator.write_article(&session_id, index, language).await?;

    println!("\nArticle written: {}", article.title);
    println!("  Id: {}", article.id);
    println!("  Subtitle: {}", article.subtitle);
    println!("  Tags: {}", article.tags.join(", "));
    println!("  Image placeholders: {}", article.image_prompts.len());
    println!("  Words: {}", article.markdown.split_whitespace().count());

    if let Some(output) = output {
        let saved = orchestrator.save_to_path(&article.markdown, &output)?;
        println!("\nSaved to {}", saved.display());
    } else {
        println!("\n--- Preview (first 2000 chars) ---\n");
        let preview: String = article.markdown.chars().take(2000).collect();
        println!("{preview}");
        if article.markdown.chars().count() > 2000 {
            println!("\n...");
        }
    }

    Ok(())
}

fn print_topics(topics: &[Topic]) {
    println!();
    for (i, topic) in topics.iter().enumerate() {
        println!("{i}. {}", topic.title);
        println!("   Hook: {}", topic.hook);
        println!("   Angle: {}", topic.angle);
        println!("   Audience: {}", topic.target_audience);
        if !topic.estimated_sections.is_empty() {
            println!("   Sections: {}", topic.estimated_sections.join(", "));
        }
        println!();
    }
}

fn prompt_topic_index(count: usize) -> Result<i64> {
    print!("Select a topic (0-{}): ", count - 1);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let index: i64 = line.trim().parse().map_err(|_| anyhow::anyhow!("not a number: {line:?}"))?;
    Ok(index)
}

fn cmd_articles(store: &ArticleStore, operation: ArticlesOperation) -> Result<()> {
    match operation {
        ArticlesOperation::List => {
            let items = store.list();
            if items.is_empty() {
                println!("No articles yet.");
                return Ok(());
            }
            for item in items {
                println!(
                    "{}  {}  [{}]  {}",
                    item.id,
                    item.updated_at.format("%Y-%m-%d %H:%M"),
                    item.project_name,
                    item.title
                );
            }
        }
        ArticlesOperation::Show { id } => {
            let article = store.get(&id)?;
            println!("# {}\n", article.title);
            if !article.subtitle.is_empty() {
                println!("_{}_\n", article.subtitle);
            }
            println!("{}", article.markdown);
            if !article.tags.is_empty() {
                println!("\nTags: {}", article.tags.join(", "));
            }
        }
        ArticlesOperation::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

fn cmd_doctor(config: &Config) -> Result<()> {
    println!("{} {}", devstory::APP_NAME, devstory::VERSION);

    let provider = ClaudeCli::new(config.claude_bin.clone());
    match provider.locate() {
        Some(path) => println!("  [ok] {} found at {}", config.claude_bin, path.display()),
        None => {
            println!(
                "  [!!] {} not found in PATH\n       install: npm install -g @anthropic-ai/claude-code",
                config.claude_bin
            );
        }
    }

    println!("  data dir: {}", config.data_dir.display());
    match ArticleStore::open(config.articles_path()) {
        Ok(store) => println!("  [ok] article store readable ({} articles)", store.count()),
        Err(e) => println!("  [!!] article store unreadable: {e}"),
    }

    println!("  generation timeout: {}s", config.generation_timeout.as_secs());
    Ok(())
}
