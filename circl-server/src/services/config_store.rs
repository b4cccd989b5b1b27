//! JSON document store for the feed configuration, stimuli and fillers
//!
//! Each resource is one pretty-printed JSON file in the data directory. The
//! store never caches: every load reads the file and every save replaces it.
//!
//! Overlapping saves to the same resource are last-write-wins. Writes go
//! through a temp file and rename, so a reader sees either the previous or
//! the new document in full, never a mix.

use std::fmt;
use std::io;
use std::path::PathBuf;

use circl_common::fs::write_json_atomic;
use circl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Top-level keys every `config` document must carry, in check order
pub const CONFIG_REQUIRED_KEYS: [&str; 3] = ["feed_settings", "personalization", "locale"];

/// A named document managed by [`ConfigStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Config,
    Stimuli,
    Fillers,
}

impl Resource {
    #[cfg(test)]
    pub const ALL: [Resource; 3] = [Resource::Config, Resource::Stimuli, Resource::Fillers];

    /// Name used in API paths
    pub fn name(self) -> &'static str {
        match self {
            Resource::Config => "config",
            Resource::Stimuli => "stimuli",
            Resource::Fillers => "fillers",
        }
    }

    /// Backing file inside the data directory
    pub fn file_name(self) -> &'static str {
        match self {
            Resource::Config => "feed-config.json",
            Resource::Stimuli => "stimuli.json",
            Resource::Fillers => "fillers.json",
        }
    }

    /// Capitalised label for user-facing messages
    pub fn label(self) -> &'static str {
        match self {
            Resource::Config => "Config",
            Resource::Stimuli => "Stimuli",
            Resource::Fillers => "Fillers",
        }
    }

    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            Resource::Config => &CONFIG_REQUIRED_KEYS,
            Resource::Stimuli | Resource::Fillers => &[],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Schemaless JSON document
///
/// Serialises exactly as the wrapped value; unknown keys and key order are
/// preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Whether the document carries no data at all
    ///
    /// `null`, `false`, `0`, `""`, `[]` and `{}` count as empty.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }

    /// Keys from `required` that are not top-level keys of the document
    ///
    /// A non-object document is missing every key.
    pub fn missing_keys<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        let object = self.0.as_object();
        required
            .iter()
            .copied()
            .filter(|key| !object.is_some_and(|map| map.contains_key(*key)))
            .collect()
    }
}

/// File-backed store for the three [`Resource`] documents
#[derive(Debug, Clone)]
pub struct ConfigStore {
    data_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the file backing `resource`
    pub fn path_for(&self, resource: Resource) -> PathBuf {
        self.data_dir.join(resource.file_name())
    }

    /// Read and parse a resource
    ///
    /// Missing file → [`Error::NotFound`]; unreadable or invalid JSON →
    /// [`Error::Storage`] carrying the underlying cause.
    pub fn load(&self, resource: Resource) -> Result<Document> {
        let path = self.path_for(resource);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("{} file not found", resource.label())));
            }
            Err(e) => return Err(Error::Storage(e.to_string())),
        };

        let document: Document =
            serde_json::from_str(&content).map_err(|e| Error::Storage(e.to_string()))?;

        debug!("Loaded {} from {}", resource, path.display());
        Ok(document)
    }

    /// Validate and persist a resource
    ///
    /// Empty documents are rejected for every resource; `config` also needs
    /// all of [`CONFIG_REQUIRED_KEYS`]. The message of a
    /// [`Error::Validation`] names every missing key.
    pub fn save(&self, resource: Resource, document: &Document) -> Result<()> {
        validate(resource, document)?;

        let path = self.path_for(resource);
        write_json_atomic(&path, document).map_err(|e| match e {
            Error::Io(io) => Error::Storage(io.to_string()),
            Error::Json(json) => Error::Storage(json.to_string()),
            other => other,
        })?;

        info!("Saved {} to {}", resource, path.display());
        Ok(())
    }
}

/// Resource-specific validation applied before any write
pub fn validate(resource: Resource, document: &Document) -> Result<()> {
    if document.is_empty() {
        return Err(Error::Validation("No data provided".to_string()));
    }

    let missing = document.missing_keys(resource.required_keys());
    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn valid_config() -> Document {
        Document::new(json!({
            "feed_settings": {"posts_per_page": 20, "show_timestamps": true},
            "personalization": {"enabled": false},
            "locale": "de-DE",
            "experimental": {"nested": [1, 2, 3]}
        }))
    }

    #[test]
    fn test_config_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());

        let doc = valid_config();
        store.save(Resource::Config, &doc).unwrap();

        let loaded = store.load(Resource::Config).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_missing_locale_is_named() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());

        let doc = Document::new(json!({
            "feed_settings": {},
            "personalization": {}
        }));

        match store.save(Resource::Config, &doc) {
            Err(Error::Validation(msg)) => assert_eq!(msg, "Missing required fields: locale"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(!store.path_for(Resource::Config).exists());
    }

    #[test]
    fn test_all_missing_keys_listed_in_check_order() {
        let doc = Document::new(json!({"personalization": {}}));
        match validate(Resource::Config, &doc) {
            Err(Error::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: feed_settings, locale")
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let not_an_object = Document::new(json!(["feed_settings"]));
        match validate(Resource::Config, &not_an_object) {
            Err(Error::Validation(msg)) => assert_eq!(
                msg,
                "Missing required fields: feed_settings, personalization, locale"
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_documents_rejected() {
        for value in [json!(null), json!({}), json!([]), json!(""), json!(false), json!(0)] {
            for resource in Resource::ALL {
                match validate(resource, &Document::new(value.clone())) {
                    Err(Error::Validation(msg)) => assert_eq!(msg, "No data provided"),
                    other => panic!("expected rejection of {} for {}, got {:?}", value, resource, other),
                }
            }
        }
    }

    #[test]
    fn test_stimuli_have_no_required_keys() {
        let doc = Document::new(json!({"posts": [{"id": "s1", "text": "Grüße"}]}));
        assert!(validate(Resource::Stimuli, &doc).is_ok());
        assert!(validate(Resource::Fillers, &doc).is_ok());
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("does_not_exist"));

        for resource in Resource::ALL {
            match store.load(resource) {
                Err(Error::NotFound(msg)) => {
                    assert_eq!(msg, format!("{} file not found", resource.label()))
                }
                other => panic!("expected not found, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_load_invalid_json_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());
        std::fs::write(store.path_for(Resource::Stimuli), "{\"posts\": [").unwrap();

        assert!(matches!(store.load(Resource::Stimuli), Err(Error::Storage(_))));
    }

    #[test]
    fn test_save_writes_pretty_json_and_keeps_non_ascii() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("data"));

        let doc = Document::new(json!({"posts": [{"text": "日本語"}], "zeta": 1, "alpha": 2}));
        store.save(Resource::Fillers, &doc).unwrap();

        let raw = std::fs::read_to_string(store.path_for(Resource::Fillers)).unwrap();
        assert!(raw.contains("日本語"));
        assert!(raw.starts_with("{\n  \"posts\": ["));
        // Key order is preserved, not sorted
        assert!(raw.find("\"zeta\"").unwrap() < raw.find("\"alpha\"").unwrap());
    }

    #[test]
    fn test_rejected_save_keeps_previous_document() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());

        let doc = valid_config();
        store.save(Resource::Config, &doc).unwrap();

        let bad = Document::new(json!({"locale": "en"}));
        assert!(store.save(Resource::Config, &bad).is_err());
        assert_eq!(store.load(Resource::Config).unwrap(), doc);
    }

    #[test]
    fn test_resource_file_names() {
        assert_eq!(Resource::Config.file_name(), "feed-config.json");
        assert_eq!(Resource::Stimuli.file_name(), "stimuli.json");
        assert_eq!(Resource::Fillers.file_name(), "fillers.json");
        assert_eq!(Resource::Config.to_string(), "config");
    }
}
