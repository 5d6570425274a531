//! Acemap Query Agent - Entry Point
//!
//! Plans, runs, compares or evaluates searches from the command line, or
//! answers queries interactively.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use acemap_agent::{SearchAgent, config::Config, evaluation, formatters, session};

#[derive(Parser, Debug)]
#[command(name = "acemap-agent")]
#[command(about = "Query understanding agent for Acemap academic search")]
#[command(version)]
struct Cli {
    /// Knowledge graph dataset (.parquet or .csv with subject/object columns)
    #[arg(long, global = true, env = "GAKG_PATH")]
    vocab: Option<PathBuf>,

    /// Grounding similarity threshold (0-100)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Completion model identifier
    #[arg(long, global = true, env = "LLM_MODEL")]
    model: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the search plan for a query as JSON
    Plan {
        /// Free-form user query
        query: String,
    },
    /// Run the agent-enhanced search for a query
    Search {
        /// Free-form user query
        query: String,

        /// Papers to fetch before filtering
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Compare raw-query search with agent-enhanced search
    Compare {
        /// One or more free-form queries
        #[arg(required = true)]
        queries: Vec<String>,

        /// Also write the Markdown report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Read queries from stdin and search each one (q, exit or quit to leave)
    Interactive,
    /// Show raw versus grounded keywords without searching
    Evaluate {
        /// Queries to evaluate; a built-in set is used when none are given
        queries: Vec<String>,

        /// Also write the rows as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(vocab) = cli.vocab {
        config.vocab_path = vocab;
    }
    if let Some(threshold) = cli.threshold {
        config.grounding_threshold = threshold;
    }
    if let Some(model) = cli.model {
        config.llm_model = model;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        ?config,
        "Starting Acemap query agent"
    );

    match cli.command {
        Command::Plan { query } => {
            let agent = SearchAgent::from_config(&config)?;
            let plan = agent.planner().plan(&query).await;
            println!("{}", serde_json::to_string_pretty(&formatters::plan_json(&plan))?);
        }
        Command::Search { query, limit, json } => {
            if let Some(limit) = limit {
                config.search_limit = limit;
            }
            let agent = SearchAgent::from_config(&config)?;
            let outcome = agent.run(&query).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&formatters::outcome_json(&outcome))?);
            } else {
                println!("{}", formatters::format_plan_markdown(&outcome.plan));
                println!("{}", formatters::format_outcome_markdown(&outcome));
            }
        }
        Command::Compare { queries, report } => {
            let agent = SearchAgent::from_config(&config)?;
            let mut comparisons = Vec::with_capacity(queries.len());
            for query in &queries {
                comparisons.push(agent.compare(query).await);
            }

            let markdown = formatters::format_report_markdown(&comparisons);
            println!("{markdown}");

            if let Some(path) = report {
                std::fs::write(&path, &markdown)?;
                tracing::info!(path = %path.display(), "Report written");
            }
        }
        Command::Interactive => {
            let agent = SearchAgent::from_config(&config)?;
            eprintln!("Type a query, or q, exit or quit to leave.");
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            session::run_session(&agent, input, tokio::io::stdout()).await?;
        }
        Command::Evaluate { queries, csv } => {
            let agent = SearchAgent::from_config(&config)?;
            let rows = if queries.is_empty() {
                evaluation::evaluate_all(agent.planner(), &evaluation::DEFAULT_QUERIES).await
            } else {
                evaluation::evaluate_all(agent.planner(), &queries).await
            };

            println!("{}", formatters::format_evaluation_markdown(&rows));

            if let Some(path) = csv {
                evaluation::write_csv(&rows, std::fs::File::create(&path)?)?;
                tracing::info!(path = %path.display(), "Evaluation written");
            }
        }
    }

    Ok(())
}
