//! Content lookups over the JSON documents in the data directory.
//!
//! Every call reads its document from disk, so edits to the files show up on
//! the next request without a restart. Records are passed through as opaque
//! JSON values; the service never looks inside them.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ContentError;

pub const LANGUAGES_FILE: &str = "languages.json";
pub const LESSONS_FILE: &str = "lessons.json";
pub const QUIZZES_FILE: &str = "quizzes.json";

/// A programming language entry available for learning
pub type Language = Value;

/// A unit of instructional content for one language
pub type Lesson = Value;

/// A single assessment item for one lesson
pub type QuizQuestion = Value;

/// Identifier-to-content lookups backed by read-only JSON files
#[derive(Debug, Clone)]
pub struct ContentService {
    data_dir: PathBuf,
}

impl ContentService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full languages catalog, in file order
    pub async fn languages(&self) -> Result<Vec<Language>, ContentError> {
        self.load(LANGUAGES_FILE).await
    }

    /// Lessons stored under `language_id`, or an empty list if the id is unknown
    pub async fn lessons(&self, language_id: &str) -> Result<Vec<Lesson>, ContentError> {
        self.lookup(LESSONS_FILE, language_id).await
    }

    /// Quiz questions stored under `lesson_id`, or an empty list if the id is unknown
    pub async fn quiz(&self, lesson_id: &str) -> Result<Vec<QuizQuestion>, ContentError> {
        self.lookup(QUIZZES_FILE, lesson_id).await
    }

    /// Only the entry under `key` is inspected; other entries may hold anything.
    async fn lookup(&self, file: &str, key: &str) -> Result<Vec<Value>, ContentError> {
        let mut by_id: Map<String, Value> = self.load(file).await?;

        match by_id.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) | None => {
                debug!("No entry for '{}' in {}", key, file);
                Ok(Vec::new())
            }
            Some(_) => Err(ContentError::NotAList {
                path: self.data_dir.join(file),
                key: key.to_string(),
            }),
        }
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> Result<T, ContentError> {
        let path = self.data_dir.join(file);

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ContentError::Read {
                path: path.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| ContentError::Parse { path, source })
    }
}
