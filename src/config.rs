use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CaptionerError, Result};

pub const DEFAULT_OUTPUT: &str = "caption.csv";
pub const DEFAULT_ALLOW_LIST: &str = "val_img_paths.json";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MAX_TOKENS: u32 = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Everything a captioning run needs, passed explicitly into [`crate::run`].
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// Directory of images or a zip archive of them.
    pub input: PathBuf,
    /// Destination CSV, truncated at the start of the run.
    pub output: PathBuf,
    /// Bearer token for the captioning service.
    pub api_key: String,
    /// JSON document listing the filenames eligible for captioning.
    pub allow_list: PathBuf,
    /// Upper bound on generated tokens per caption.
    pub max_tokens: u32,
    pub model: String,
    pub endpoint: String,
    /// Per-request timeout. A hung request would otherwise stall the run.
    pub timeout: Duration,
    /// Parent for the archive scratch directory; the system temp dir if unset.
    pub scratch_dir: Option<PathBuf>,
}

impl CaptionConfig {
    pub fn new(input: impl Into<PathBuf>, api_key: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            api_key: api_key.into(),
            allow_list: PathBuf::from(DEFAULT_ALLOW_LIST),
            max_tokens: DEFAULT_MAX_TOKENS,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            scratch_dir: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_allow_list(mut self, allow_list: impl Into<PathBuf>) -> Self {
        self.allow_list = allow_list.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(scratch_dir.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(CaptionerError::Config(
                "API key not found. Pass --api-key or set OPENAI_API_KEY".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(CaptionerError::Config(
                "max tokens must be greater than 0".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(CaptionerError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(CaptionerError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }
}
