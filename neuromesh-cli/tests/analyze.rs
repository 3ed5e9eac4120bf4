use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn iron_knight() -> Value {
    json!({
        "analysis": {
            "characterName": "Iron Knight",
            "archetype": "Tank",
            "estimatedHeight": "1.9m",
            "complexity": "Medium",
            "topologyStrategy": "box-modeling",
            "riggingNotes": "standard biped",
            "parts": [{
                "name": "Head",
                "type": "Sphere",
                "dimensions": "0.3x0.3x0.3",
                "material": "Skin",
                "description": "head sphere"
            }],
            "materials": [{ "name": "Skin", "roughness": 0.6, "metallic": 0.0, "baseColorHex": "#E0AC69" }]
        },
        "script": "import bpy\n..."
    })
}

fn reply_with_text(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] }, "finishReason": "STOP" }]
    }))
}

fn write_image(dir: &Path) -> std::path::PathBuf {
    let image = dir.join("hero.png");
    fs::write(&image, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();
    image
}

fn neuromesh(server: &MockServer, dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("neuromesh").unwrap();
    cmd.current_dir(dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("NEUROMESH_MODEL")
        .env_remove("NEUROMESH_LOG")
        .env("NO_COLOR", "1")
        .env("NEUROMESH_ENDPOINT", server.uri());
    cmd
}

#[tokio::test]
async fn test_analyze_writes_script_and_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(reply_with_text(&iron_knight().to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());
    let out_dir = dir.path().join("out");

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&image)
        .args(["--api-key", "test-key", "--model", "gemini-test", "--out-dir"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("IRON KNIGHT"))
        .stdout(predicate::str::contains("REF: Tank"))
        .stdout(predicate::str::contains("1 │ import bpy"))
        .stdout(predicate::str::contains("iron_knight_builder.py"))
        .stdout(predicate::str::contains("iron_knight_analysis.json"));

    assert_eq!(fs::read_to_string(out_dir.join("iron_knight_builder.py")).unwrap(), "import bpy\n...");

    let analysis = fs::read_to_string(out_dir.join("iron_knight_analysis.json")).unwrap();
    assert!(analysis.starts_with("{\n  \"analysis\": {\n    \"characterName\": \"Iron Knight\","));
    let parsed: Value = serde_json::from_str(&analysis).unwrap();
    assert_eq!(parsed, iron_knight());
}

#[tokio::test]
async fn test_analyze_reads_key_from_environment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-goog-api-key", "env-key"))
        .respond_with(reply_with_text(&iron_knight().to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    neuromesh(&server, dir.path())
        .env("GEMINI_API_KEY", "env-key")
        .arg("analyze")
        .arg(&image)
        .args(["--export", "script", "--no-script"])
        .assert()
        .success();

    assert!(dir.path().join("iron_knight_builder.py").exists());
    assert!(!dir.path().join("iron_knight_analysis.json").exists());
}

#[tokio::test]
async fn test_analyze_without_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply_with_text(&iron_knight().to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: API key is missing"))
        .stderr(predicate::str::contains("GEMINI_API_KEY"));

    assert!(!dir.path().join("iron_knight_builder.py").exists());
}

#[tokio::test]
async fn test_analyze_non_json_reply_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply_with_text("The character is a knight in heavy armour."))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&image)
        .args(["--api-key", "test-key"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("IRON KNIGHT").not())
        .stderr(predicate::str::contains("response is not valid JSON"));
}

#[tokio::test]
async fn test_analyze_empty_reply_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply_with_text(""))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&image)
        .args(["--api-key", "test-key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: No response from AI"));
}

#[tokio::test]
async fn test_analyze_service_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&image)
        .args(["--api-key", "test-key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("429: Resource has been exhausted"));
}

#[tokio::test]
async fn test_analyze_rejects_unsupported_file_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply_with_text("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "not an image").unwrap();

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&notes)
        .args(["--api-key", "test-key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported media type"));
}

#[tokio::test]
async fn test_analyze_reports_missing_key_before_file_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply_with_text("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "not an image").unwrap();

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&notes)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Source detected").not())
        .stderr(predicate::str::contains("Error: API key is missing"))
        .stderr(predicate::str::contains("unsupported media type").not());
}

#[tokio::test]
async fn test_analyze_copy_emits_clipboard_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply_with_text(&iron_knight().to_string()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let image = write_image(dir.path());

    neuromesh(&server, dir.path())
        .arg("analyze")
        .arg(&image)
        .args(["--api-key", "test-key", "--export", "none", "--copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b]52;c;aW1wb3J0IGJweQouLi4=\x07"))
        .stdout(predicate::str::contains("Copied build script to clipboard."));

    assert!(!dir.path().join("iron_knight_builder.py").exists());
}
