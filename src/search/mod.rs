//! Result ranking, highlighting, snippets and pagination
//!
//! Everything in here is synchronous and side-effect free: it takes the query
//! and the candidate set from one search response and derives what the user
//! sees.

pub mod candidate;
pub mod highlight;
pub mod matching;
pub mod pagination;
pub mod ranking;
pub mod results;
pub mod snippet;


pub use candidate::Candidate;
pub use results::{AnnotatedResult, PipelineOptions, ResultSet};
pub use snippet::SnippetOptions;
