use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{CaptionerError, Result};

/// On-disk shapes accepted for the allow-list: a plain array of filenames,
/// or an object keyed by filename (values are ignored).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AllowListDocument {
    Names(Vec<String>),
    Keyed(Map<String, Value>),
}

/// Filenames eligible for captioning. Matching is exact on the bare filename.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    names: HashSet<String>,
}

impl AllowList {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| CaptionerError::AllowList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let list = Self::from_json(&raw).map_err(|reason| CaptionerError::AllowList {
            path: path.to_path_buf(),
            reason,
        })?;
        info!("Loaded {} allowed filenames from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn from_json(raw: &str) -> std::result::Result<Self, String> {
        let document: AllowListDocument = serde_json::from_str(raw).map_err(|_| {
            "expected a JSON array of filenames or an object keyed by filename".to_string()
        })?;

        let names = match document {
            AllowListDocument::Names(names) => names.into_iter().collect(),
            AllowListDocument::Keyed(map) => map.into_iter().map(|(name, _)| name).collect(),
        };
        Ok(Self { names })
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.names.contains(file_name)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
