use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CROWN_RATES: &str = r#"{"headerText":"Crown Rates","items":[{"item":"Pen","rate":"10"}],"footerText":"Min Qty 10\nFolder only Rate"}"#;

fn ink2text(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ink2text").unwrap();
    cmd.arg("--config-dir")
        .arg(config_dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("INK2TEXT_CONFIG_DIR");
    cmd
}

fn saved_result(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("result.json");
    fs::write(&path, CROWN_RATES).unwrap();
    path
}

#[test]
fn test_convert_without_key_fails_before_network() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("note.png");
    fs::write(&image, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

    ink2text(dir.path())
        .arg("convert")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("API Key is missing. Please set it in the settings."));
}

#[test]
fn test_convert_missing_file() {
    let dir = TempDir::new().unwrap();

    ink2text(dir.path())
        .args(["convert", "does-not-exist.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_render_text() {
    let dir = TempDir::new().unwrap();
    let result = saved_result(&dir);

    ink2text(dir.path())
        .arg("render")
        .arg(&result)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout("Crown Rates\n\nPen\t₹10\n\nMin Qty 10\nFolder only Rate\n");
}

#[test]
fn test_render_styled_table() {
    let dir = TempDir::new().unwrap();
    let result = saved_result(&dir);

    ink2text(dir.path())
        .arg("render")
        .arg(&result)
        .assert()
        .success()
        .stdout(predicate::str::contains("│ Item Name │ Rate (₹) │"))
        .stdout(predicate::str::contains("│ Pen       │       10 │"));
}

#[test]
fn test_render_html_with_preferences() {
    let dir = TempDir::new().unwrap();
    let result = saved_result(&dir);

    ink2text(dir.path())
        .arg("render")
        .arg(&result)
        .args(["--format", "html", "--font", "serif", "--bold", "--color", "#EC4899"])
        .assert()
        .success()
        .stdout(predicate::str::contains("color:#EC4899"))
        .stdout(predicate::str::contains("font-weight:bold"))
        .stdout(predicate::str::contains("Crown Rates"));
}

#[test]
fn test_render_pdf_and_save() {
    let dir = TempDir::new().unwrap();
    let result = saved_result(&dir);
    let pdf = dir.path().join("out.pdf");
    let saved = dir.path().join("copy.json");

    ink2text(dir.path())
        .arg("render")
        .arg(&result)
        .arg("--pdf")
        .arg(&pdf)
        .arg("--save")
        .arg(&saved)
        .assert()
        .success();

    let bytes = fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(json["headerText"], "Crown Rates");
    assert_eq!(json["items"][0]["rate"], "10");
}

#[test]
fn test_render_empty_result_writes_no_pdf() {
    let dir = TempDir::new().unwrap();
    let result = dir.path().join("empty.json");
    fs::write(&result, r#"{"headerText":"","items":[],"footerText":""}"#).unwrap();
    let pdf = dir.path().join("out.pdf");

    ink2text(dir.path())
        .arg("render")
        .arg(&result)
        .arg("--pdf")
        .arg(&pdf)
        .assert()
        .success()
        .stderr(predicate::str::contains("Your converted content will appear here."));

    assert!(!pdf.exists());
}

#[test]
fn test_key_set_show_clear() {
    let dir = TempDir::new().unwrap();

    ink2text(dir.path())
        .args(["key", "set", "AIzaSecretKey1234"])
        .assert()
        .success();

    ink2text(dir.path())
        .args(["key", "show"])
        .assert()
        .success()
        .stdout("*************1234\n");

    let stored = fs::read_to_string(dir.path().join("settings.json")).unwrap();
    assert!(stored.contains("gemini_api_key"));

    ink2text(dir.path())
        .args(["key", "clear"])
        .assert()
        .success();

    ink2text(dir.path())
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No API key stored"));
}

#[test]
fn test_config_path_and_init() {
    let dir = TempDir::new().unwrap();

    ink2text(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));

    ink2text(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("config.json").exists());

    ink2text(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    ink2text(dir.path())
        .args(["config", "set", "service.model", "gemini-2.5-pro"])
        .assert()
        .success();

    ink2text(dir.path())
        .args(["config", "get", "service.model"])
        .assert()
        .success()
        .stdout("\"gemini-2.5-pro\"\n");

    ink2text(dir.path())
        .args(["config", "set", "formatting.font_family", "serif"])
        .assert()
        .success();

    ink2text(dir.path())
        .args(["config", "set", "formatting.text_color", "not-a-color"])
        .assert()
        .failure();

    ink2text(dir.path())
        .args(["config", "get", "service.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    ink2text(dir.path())
        .args(["config", "set", "service.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: service.nope"));
}
