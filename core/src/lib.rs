pub mod error;
pub mod literal;
pub mod mapper;
pub mod persist;
pub mod pipeline;
pub mod record;
pub mod stats;
pub mod summary;

pub use error::{PrepError, Result};
pub use record::{Genre, KeywordPhrase, OutputRecord, RawGame, RawMovie, RecordId};
pub use summary::{build_summary, summarize, Summary, DEFAULT_CAPACITY};
