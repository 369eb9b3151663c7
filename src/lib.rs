pub mod allow_list;
pub mod archive;
pub mod captioner;
pub mod config;
pub mod dedup;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod scan;
pub mod writer;

pub use captioner::{CaptionOutcome, CaptionService, OpenAiCaptioner};
pub use config::CaptionConfig;
pub use error::{CaptionerError, Result};
pub use pipeline::{run, RunSummary};
