//! On-demand image listing per condition
//!
//! Unlike the catalog build this reads the images root on every call and
//! does not parse directory names; any subdirectory counts as a condition.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use circl_common::{DirLister, Error, FileEntry, Result};
use serde::Serialize;

/// Extensions listed by the media endpoints (compared lowercased)
///
/// Narrower than the catalog scan: `.jpeg` files are not listed here.
/// Case is ignored, so `X.JPG` is listed, unlike a case-sensitive
/// `*.jpg` glob on Linux.
pub const MEDIA_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// URL prefix under which the images root is served
pub const MEDIA_URL_PREFIX: &str = "/generated_images";

/// Image names for one condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionSummary {
    pub condition_id: String,
    pub images: Vec<String>,
    pub count: usize,
}

/// Listing of every condition directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageListing {
    pub conditions: Vec<ConditionSummary>,
    pub total_conditions: usize,
    pub total_images: usize,
}

/// One servable image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFile {
    pub filename: String,
    pub path: String,
    pub size: u64,
}

/// Detailed listing of a single condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionImages {
    pub condition_id: String,
    pub images: Vec<ImageFile>,
    pub count: usize,
}

#[derive(Clone)]
pub struct MediaIndex {
    lister: Arc<dyn DirLister>,
    images_root: PathBuf,
}

impl MediaIndex {
    pub fn new(lister: Arc<dyn DirLister>, images_root: impl Into<PathBuf>) -> Self {
        Self {
            lister,
            images_root: images_root.into(),
        }
    }

    /// List every condition directory with its image names
    ///
    /// A missing images root yields an empty listing.
    pub fn list_all(&self) -> Result<ImageListing> {
        let mut dirs = match self.lister.list_dirs(&self.images_root) {
            Ok(dirs) => dirs,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        dirs.sort();

        let mut conditions = Vec::with_capacity(dirs.len());
        for condition_id in dirs {
            let images: Vec<String> = self
                .images_in(&condition_id)?
                .into_iter()
                .map(|entry| entry.name)
                .collect();
            conditions.push(ConditionSummary {
                condition_id,
                count: images.len(),
                images,
            });
        }

        let total_images = conditions.iter().map(|c| c.count).sum();
        Ok(ImageListing {
            total_conditions: conditions.len(),
            total_images,
            conditions,
        })
    }

    /// List one condition with servable paths and file sizes
    pub fn list_one(&self, condition_id: &str) -> Result<ConditionImages> {
        if !is_valid_condition_id(condition_id) {
            return Err(Error::Validation(format!(
                "Invalid condition id: {}",
                condition_id
            )));
        }

        if !self.lister.is_dir(&self.images_root.join(condition_id)) {
            return Err(Error::NotFound(format!("Condition {} not found", condition_id)));
        }

        let images: Vec<ImageFile> = self
            .images_in(condition_id)?
            .into_iter()
            .map(|entry| ImageFile {
                path: format!("{}/{}/{}", MEDIA_URL_PREFIX, condition_id, entry.name),
                filename: entry.name,
                size: entry.size,
            })
            .collect();

        Ok(ConditionImages {
            condition_id: condition_id.to_string(),
            count: images.len(),
            images,
        })
    }

    /// Image files of one condition, sorted by name
    fn images_in(&self, condition_id: &str) -> Result<Vec<FileEntry>> {
        let mut images: Vec<FileEntry> = self
            .lister
            .list_files(&self.images_root.join(condition_id))?
            .into_iter()
            .filter(|entry| {
                entry
                    .extension()
                    .is_some_and(|ext| MEDIA_EXTENSIONS.contains(&ext.as_str()))
            })
            .collect();
        images.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(images)
    }
}

/// Reject identifiers that would escape the images root
fn is_valid_condition_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.contains('\0')
}
