//! Catalog generation against a real directory tree
//!
//! Tests cover:
//! - Scenario build from disk with prompt files
//! - Skip diagnostics for unparsable and image-less directories
//! - Output written only after a successful scan
//! - Deterministic filters and conditions across runs
//! - File mode kept across rebuilds

use std::path::Path;
use std::sync::Arc;

use circl_common::OsLister;
use circl_server::services::catalog_builder::SkipReason;
use circl_server::services::{write_catalog, Catalog, CatalogBuilder};
use serde_json::Value;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn images_root(temp: &TempDir) -> std::path::PathBuf {
    let root = temp.path().join("generated_images");
    touch(&root, "young_male_healthcare_leftist/a.jpg", "jpg");
    touch(&root, "young_male_healthcare_leftist/prompt.txt", "Show a doctor\n");
    touch(&root, "senior_female_tax_policy_rightist/b.png", "png");
    touch(&root, "adults_leftist/c.jpg", "jpg");
    touch(&root, "young_male_housing_neutral/readme.md", "no images here");
    // Loose files in the root are not conditions
    touch(&root, "stray.jpg", "jpg");
    root
}

fn builder(root: &Path) -> CatalogBuilder {
    CatalogBuilder::new(Arc::new(OsLister), root)
}

#[test]
fn test_build_from_disk() {
    let temp = TempDir::new().unwrap();
    let root = images_root(&temp);

    let build = builder(&root).build().unwrap();
    let catalog = &build.catalog;

    assert_eq!(catalog.meta.total_conditions, 2);
    assert_eq!(catalog.meta.images_dir, "generated_images");

    let ids: Vec<&str> = catalog
        .conditions
        .iter()
        .map(|c| c.condition_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["senior_female_tax_policy_rightist", "young_male_healthcare_leftist"]
    );

    let young = &catalog.conditions[1];
    assert_eq!(young.prompt, "Show a doctor");
    assert_eq!(young.ideology, "left");

    let reasons: Vec<(&str, SkipReason)> = build
        .skipped
        .iter()
        .map(|s| (s.condition_id.as_str(), s.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("adults_leftist", SkipReason::Unparsable),
            ("young_male_housing_neutral", SkipReason::NoImages),
        ]
    );

    assert_eq!(catalog.filters.age_groups, vec!["senior", "young"]);
    assert_eq!(catalog.filters.policy_issues, vec!["healthcare", "tax_policy"]);
    assert_eq!(catalog.filters.ideologies, vec!["left", "neutral", "right"]);
}

#[test]
fn test_written_catalog_matches_build() {
    let temp = TempDir::new().unwrap();
    let root = images_root(&temp);
    let output = temp.path().join("site").join("conditions.json");

    let build = builder(&root).build().unwrap();
    write_catalog(&build.catalog, &output).unwrap();

    let raw = std::fs::read_to_string(&output).unwrap();
    let parsed: Catalog = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, build.catalog);

    let value: Value = serde_json::from_str(&raw).unwrap();
    assert!(value["meta"]["generated_at"].is_string());
    assert_eq!(value["conditions"][0]["image_dir"], "senior_female_tax_policy_rightist");
}

#[test]
fn test_failed_scan_leaves_previous_catalog() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("conditions.json");
    std::fs::write(&output, "{\"previous\": true}").unwrap();

    let missing = temp.path().join("no_such_images_dir");
    let result = builder(&missing)
        .build()
        .and_then(|build| write_catalog(&build.catalog, &output));
    assert!(matches!(result, Err(circl_common::Error::NotFound(_))));

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "{\"previous\": true}"
    );
}

#[test]
fn test_rebuild_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let root = images_root(&temp);

    let first = builder(&root).build().unwrap().catalog;
    let second = builder(&root).build().unwrap().catalog;

    assert_eq!(
        serde_json::to_vec(&first.filters).unwrap(),
        serde_json::to_vec(&second.filters).unwrap()
    );
    assert_eq!(
        serde_json::to_vec(&first.conditions).unwrap(),
        serde_json::to_vec(&second.conditions).unwrap()
    );
}

#[cfg(unix)]
#[test]
fn test_rebuild_keeps_catalog_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = images_root(&temp);
    let output = temp.path().join("conditions.json");
    std::fs::write(&output, "{}").unwrap();
    std::fs::set_permissions(&output, std::fs::Permissions::from_mode(0o644)).unwrap();

    let build = builder(&root).build().unwrap();
    write_catalog(&build.catalog, &output).unwrap();

    let mode = std::fs::metadata(&output).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
