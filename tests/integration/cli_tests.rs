//! Integration tests for the command-line binary
//!
//! Each test writes a config file whose caches live in a temp directory and
//! runs the compiled `pixel-sift` binary against it.

use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a config that keeps both caches under `dir` and disables recognition
fn write_config(dir: &Path) -> std::path::PathBuf {
    let config_path = dir.join("pixel-sift.toml");
    let config = format!(
        r#"
[cache]
pages-dir = "{}"
images-dir = "{}"

[ocr]
command = "/nonexistent/tesseract-binary"
"#,
        dir.join("pages").display(),
        dir.join("images").display()
    );
    std::fs::write(&config_path, config).unwrap();
    config_path
}

async fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pixel-sift"))
        .args(args)
        .output()
        .await
        .expect("Failed to run pixel-sift")
}

#[tokio::test]
async fn test_blank_terms_fail_before_clearing_caches() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let pages = dir.path().join("pages");
    std::fs::create_dir_all(&pages).unwrap();
    std::fs::write(pages.join("entry.json"), "{}").unwrap();

    let output = run(&[
        "--sitemap",
        "http://127.0.0.1:1/sitemap.xml",
        "--search-terms",
        "  ",
        "--clear-cache",
        "--config",
        config.to_str().unwrap(),
    ])
    .await;

    assert!(!output.status.success());
    assert!(pages.join("entry.json").exists());
}

#[tokio::test]
async fn test_large_worker_count_and_sitemap_error_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let csv_path = dir.path().join("out.csv");
    let sitemap = format!("{}/sitemap.xml", server.uri());

    let output = run(&[
        "--sitemap",
        &sitemap,
        "--search-terms",
        "logo",
        "--workers",
        "100",
        "--output",
        csv_path.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ])
    .await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 0 matching images"));
    assert!(stdout.contains("No matching images found to save"));
    assert!(!csv_path.exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("returned HTTP 404").count(), 1);
}
