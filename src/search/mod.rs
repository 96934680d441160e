//! Search strategies over extracted messages
//!
//! - [`exact`] - Case-insensitive substring filter, always available
//! - [`semantic`] - Re-ranking through a [`RankingCollaborator`], falling back to exact search
//! - [`debounce`] / [`live`] - Debounced semantic search for an interactive query box
//! - [`command_ranker`] - Collaborator that shells out to an assistant CLI

pub mod command_ranker;
pub mod debounce;
pub mod exact;
pub mod live;
pub mod ranking;
pub mod semantic;

pub use command_ranker::CommandRanker;
pub use debounce::Debouncer;
pub use exact::{Searchable, exact_search};
pub use live::{LiveSearch, SearchSnapshot};
pub use ranking::{RankingCollaborator, RankingError};
pub use semantic::{SearchStatus, SemanticResult, build_prompt, parse_ranked_indices, semantic_search};
