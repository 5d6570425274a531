//! Acemap Query Agent
//!
//! Turns a free-form (possibly misspelled, abbreviated or non-English) query
//! into a normalized search request for the Acemap academic search service.
//!
//! # Pipeline
//!
//! - **Extraction**: a hosted language model turns the query into a coarse
//!   [`models::RawIntent`] (keywords, institution, author, year range).
//! - **Grounding**: each keyword is fuzzy-matched against a controlled
//!   vocabulary built from a geoscience knowledge graph and corrected when
//!   the similarity reaches the threshold.
//! - **Planning**: the grounded keywords and filters form a
//!   [`models::SearchPlan`].
//! - **Filtering**: search results are post-filtered on publication year.
//!
//! Every collaborator failure degrades instead of erroring: no vocabulary
//! means identity grounding, a bad completion means the whole query is the
//! keyword, and a failed search means no results.
//!
//! # Example
//!
//! ```no_run
//! use acemap_agent::{SearchAgent, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let agent = SearchAgent::from_config(&config)?;
//!
//!     let outcome = agent.run("recent papers about Grnite").await;
//!     println!("searched for {}", outcome.choice.keyword);
//!     Ok(())
//! }
//! ```

pub mod agent;
mod client;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod formatters;
pub mod grounding;
pub mod llm;
pub mod models;
pub mod planner;
pub mod search;
pub mod session;
pub mod vocabulary;

pub use agent::{AgentOutcome, Comparison, SearchAgent};
pub use config::Config;
pub use error::{ClientError, VocabularyError};
pub use evaluation::EvaluationRow;
pub use grounding::TermGrounder;
pub use llm::IntentExtractor;
pub use planner::QueryPlanner;
pub use search::{AcemapClient, PaperSearch, ResultFilter};
pub use vocabulary::VocabularyStore;
