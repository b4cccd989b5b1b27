//! Condition catalog builder
//!
//! Scans an images root with one subdirectory per condition and assembles
//! the catalog document consumed by the gallery front-end. The build is a
//! one-shot batch job; its output is only written once the whole scan has
//! succeeded.

use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use circl_common::condition::IDEOLOGIES;
use circl_common::fs::write_json_atomic;
use circl_common::{ConditionId, DirLister, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Image extensions picked up by the catalog scan (compared lowercased)
pub const CATALOG_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Optional per-condition file holding the generation prompt
pub const PROMPT_FILE: &str = "prompt.txt";

/// Timestamp format of `meta.generated_at`
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One parsed, image-bearing condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub condition_id: String,
    pub age_group: String,
    pub gender: String,
    pub policy_issue: String,
    pub ideology: String,
    pub images: Vec<String>,
    pub prompt: String,
    pub image_dir: String,
}

/// Build metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMeta {
    pub generated_at: String,
    pub total_conditions: usize,
    pub images_dir: String,
}

/// Filter facets for the gallery UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub age_groups: Vec<String>,
    pub genders: Vec<String>,
    pub policy_issues: Vec<String>,
    /// Always `left`, `neutral`, `right`, whatever the data contains
    pub ideologies: Vec<String>,
}

impl Filters {
    /// Derive sorted distinct facet values from the conditions present
    pub fn from_conditions(conditions: &[Condition]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
            values
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        Self {
            age_groups: distinct(conditions.iter().map(|c| &c.age_group)),
            genders: distinct(conditions.iter().map(|c| &c.gender)),
            policy_issues: distinct(conditions.iter().map(|c| &c.policy_issue)),
            ideologies: IDEOLOGIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The generated catalog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub meta: CatalogMeta,
    pub filters: Filters,
    pub conditions: Vec<Condition>,
}

/// Why a directory was left out of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Name has fewer than four underscore-delimited tokens
    Unparsable,
    /// No `.jpg`/`.jpeg`/`.png` file inside
    NoImages,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unparsable => write!(f, "unparsable"),
            SkipReason::NoImages => write!(f, "no images"),
        }
    }
}

/// Skip diagnostic for one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDirectory {
    pub condition_id: String,
    pub reason: SkipReason,
}

/// Result of a catalog build
#[derive(Debug, Clone)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    pub skipped: Vec<SkippedDirectory>,
}

/// Scans an images root into a [`Catalog`]
#[derive(Clone)]
pub struct CatalogBuilder {
    lister: Arc<dyn DirLister>,
    images_root: PathBuf,
}

impl CatalogBuilder {
    pub fn new(lister: Arc<dyn DirLister>, images_root: impl Into<PathBuf>) -> Self {
        Self {
            lister,
            images_root: images_root.into(),
        }
    }

    /// Scan the images root, stamping the catalog with the current local time
    pub fn build(&self) -> Result<CatalogBuild> {
        let generated_at = chrono::Local::now().format(GENERATED_AT_FORMAT).to_string();
        self.build_with_timestamp(generated_at)
    }

    /// Scan the images root with a caller-supplied `generated_at`
    pub fn build_with_timestamp(&self, generated_at: String) -> Result<CatalogBuild> {
        let mut dirs = match self.lister.list_dirs(&self.images_root) {
            Ok(dirs) => dirs,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!(
                    "Images directory {}",
                    self.images_root.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };
        dirs.sort();

        let mut conditions = Vec::new();
        let mut skipped = Vec::new();

        for dir_name in dirs {
            match self.scan_condition(&dir_name)? {
                Ok(condition) => conditions.push(condition),
                Err(reason) => {
                    warn!("Skipping {} - {}", dir_name, reason);
                    skipped.push(SkippedDirectory {
                        condition_id: dir_name,
                        reason,
                    });
                }
            }
        }

        let filters = Filters::from_conditions(&conditions);
        let meta = CatalogMeta {
            generated_at,
            total_conditions: conditions.len(),
            images_dir: source_dir_name(&self.images_root),
        };

        info!(
            "Scanned {}: {} conditions, {} skipped",
            self.images_root.display(),
            conditions.len(),
            skipped.len()
        );

        Ok(CatalogBuild {
            catalog: Catalog {
                meta,
                filters,
                conditions,
            },
            skipped,
        })
    }

    /// Outer error aborts the build; inner error skips the directory
    fn scan_condition(
        &self,
        dir_name: &str,
    ) -> Result<std::result::Result<Condition, SkipReason>> {
        let parsed = match ConditionId::parse(dir_name) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(Err(SkipReason::Unparsable)),
        };

        let dir = self.images_root.join(dir_name);

        let mut images: Vec<String> = self
            .lister
            .list_files(&dir)?
            .into_iter()
            .filter(|entry| {
                entry
                    .extension()
                    .is_some_and(|ext| CATALOG_EXTENSIONS.contains(&ext.as_str()))
            })
            .map(|entry| entry.name)
            .collect();

        if images.is_empty() {
            return Ok(Err(SkipReason::NoImages));
        }
        images.sort();

        let prompt = self.read_prompt(&dir);
        debug!("{}: {} images", dir_name, images.len());

        Ok(Ok(Condition {
            condition_id: dir_name.to_string(),
            age_group: parsed.age_group,
            gender: parsed.gender,
            policy_issue: parsed.policy_issue,
            ideology: parsed.ideology,
            images,
            prompt,
            image_dir: dir_name.to_string(),
        }))
    }

    /// Trimmed prompt text, empty when absent or unreadable
    fn read_prompt(&self, dir: &Path) -> String {
        let path = dir.join(PROMPT_FILE);
        match self.lister.read_to_string(&path) {
            Ok(Some(text)) => text.trim().to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Ignoring unreadable prompt {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}

/// Name recorded in `meta.images_dir`
fn source_dir_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// Persist a catalog as pretty-printed JSON, replacing `path` atomically
pub fn write_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    write_json_atomic(path, catalog)?;
    info!(
        "Wrote catalog with {} conditions to {}",
        catalog.meta.total_conditions,
        path.display()
    );
    Ok(())
}
