//! Command-line and environment resolution for both binaries
//!
//! Note: uses serial_test because clap reads the CIRCL_* environment
//! variables; tests that set them are marked #[serial].

use std::env;
use std::path::{Path, PathBuf};

use circl_server::cli::{config_path, GenerateArgs, ServerArgs};
use clap::Parser;
use serial_test::serial;
use tempfile::TempDir;

const CIRCL_VARS: [&str; 7] = [
    "CIRCL_CONFIG",
    "CIRCL_HOST",
    "CIRCL_PORT",
    "CIRCL_BASE_DIR",
    "CIRCL_DATA_DIR",
    "CIRCL_IMAGES_DIR",
    "CIRCL_LOG_LEVEL",
];

fn clear_env() {
    for var in CIRCL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_env_fallbacks_feed_server_config() {
    clear_env();
    let temp = TempDir::new().unwrap();

    env::set_var("CIRCL_PORT", "9123");
    env::set_var("CIRCL_BASE_DIR", temp.path());

    let config = ServerArgs::try_parse_from(["circl-server"])
        .unwrap()
        .resolve()
        .unwrap();
    clear_env();

    assert_eq!(config.port, 9123);
    assert_eq!(config.base_dir, temp.path());
    assert_eq!(config.data_dir, temp.path().join("circl/data"));
    assert_eq!(config.images_dir, temp.path().join("generated_images"));
    assert_eq!(config.host, "0.0.0.0");
}

#[test]
#[serial]
fn test_command_line_beats_env() {
    clear_env();
    env::set_var("CIRCL_PORT", "9123");

    let config = ServerArgs::try_parse_from(["circl-server", "--port", "7000"])
        .unwrap()
        .resolve()
        .unwrap();
    clear_env();

    assert_eq!(config.port, 7000);
}

#[test]
#[serial]
fn test_env_beats_toml_in_base_dir() {
    clear_env();
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("circl.toml"),
        "port = 8100\nhost = \"127.0.0.1\"\n",
    )
    .unwrap();

    env::set_var("CIRCL_PORT", "9200");
    let config = ServerArgs::try_parse_from([
        "circl-server",
        "--base-dir",
        temp.path().to_str().unwrap(),
    ])
    .unwrap()
    .resolve()
    .unwrap();
    clear_env();

    assert_eq!(config.port, 9200);
    assert_eq!(config.host, "127.0.0.1");
}

#[test]
#[serial]
fn test_missing_explicit_config_is_rejected() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.toml");

    let err = ServerArgs::try_parse_from(["circl-server", "--config", missing.to_str().unwrap()])
        .unwrap()
        .resolve()
        .unwrap_err();
    assert!(err.to_string().contains("Config file not found"));

    env::set_var("CIRCL_CONFIG", &missing);
    let err = GenerateArgs::try_parse_from(["generate-conditions"])
        .unwrap()
        .resolve()
        .unwrap_err();
    clear_env();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
#[serial]
fn test_generator_reads_explicit_config() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join("gen.toml");
    std::fs::write(
        &config_file,
        format!(
            "base_dir = {:?}\nimages_dir = \"imgs\"\n",
            temp.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let config = GenerateArgs::try_parse_from([
        "generate-conditions",
        "--config",
        config_file.to_str().unwrap(),
        "--output",
        "out/catalog.json",
    ])
    .unwrap()
    .resolve()
    .unwrap();

    assert_eq!(config.images_dir, temp.path().join("imgs"));
    assert_eq!(config.catalog_file, temp.path().join("out/catalog.json"));
}

#[test]
fn test_implicit_config_path() {
    assert_eq!(
        config_path(None, Some(Path::new("/srv/circl"))).unwrap(),
        PathBuf::from("/srv/circl/circl.toml")
    );
    assert_eq!(config_path(None, None).unwrap(), PathBuf::from("circl.toml"));
}
