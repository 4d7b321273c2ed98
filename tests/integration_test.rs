// ABOUTME: Command-line tests for the prompt2pptx binary
// ABOUTME: Runs offline subcommands through cargo and checks their output

mod common;

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_command(args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new("cargo")
        .arg("run")
        .arg("--")
        .args(args)
        .envs(envs.iter().copied())
        .env_remove("OPENAI_API_KEY")
        .output()
        .expect("Failed to execute command")
}

/// Run the binary from `dir`, so a `.env` file there is picked up.
fn run_command_in(dir: &std::path::Path, args: &[&str]) -> Output {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
    Command::new("cargo")
        .arg("run")
        .arg("--quiet")
        .arg("--manifest-path")
        .arg(manifest)
        .arg("--")
        .args(args)
        .current_dir(dir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("POM_BUILDER_PROGRAM")
        .env_remove("POM_BUILDER_SCRIPT")
        .env_remove("PROMPT2PPTX_CANVAS")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_validate_command_prints_document() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_path = temp_dir.path().join("reply.md");
    let reply = format!("Sure!\n```json\n{}\n```\n", common::slides_json(2));
    fs::write(&input_path, reply).expect("Failed to write model output");

    let output = run_command(&["validate", "-i", input_path.to_str().unwrap()], &[]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let document: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout is a JSON document");
    let slides = document.as_array().expect("document is an array");
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0]["type"], "vstack");
    assert_eq!(slides[0]["w"], "max");
}

#[test]
fn test_validate_command_reports_error_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_path = temp_dir.path().join("reply.json");
    fs::write(
        &input_path,
        r#"[{"type": "vstack", "children": [{"type": "text", "text": 42}]}]"#,
    )
    .expect("Failed to write model output");

    let output = run_command(&["validate", "-i", input_path.to_str().unwrap()], &[]);
    assert!(!output.status.success(), "Command unexpectedly succeeded");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(stderr.contains("$[0].children[0].text"), "stderr: {}", stderr);
}

#[test]
fn test_validate_command_warns_about_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_path = temp_dir.path().join("reply.json");
    fs::write(
        &input_path,
        r##"[{"type": "text", "text": "Loose text", "color": "#FF0000"}]"##,
    )
    .expect("Failed to write model output");

    let output = run_command(&["validate", "-i", input_path.to_str().unwrap()], &[]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning:"), "stderr: {}", stderr);
}

#[cfg(unix)]
#[test]
fn test_build_command_uses_configured_builder() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let script = common::write_fake_builder(temp_dir.path());
    let input_path = temp_dir.path().join("deck.json");
    fs::write(&input_path, common::slides_json(3)).expect("Failed to write document");
    let output_path = temp_dir.path().join("deck.pptx");

    let output = run_command(
        &[
            "build",
            "-i",
            input_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
        ],
        &[
            ("POM_BUILDER_PROGRAM", "sh"),
            ("POM_BUILDER_SCRIPT", script.to_str().unwrap()),
            ("PROMPT2PPTX_CANVAS", "1920x1080"),
        ],
    );
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_path.exists(), "Output file was not created");

    let size = fs::read_to_string(temp_dir.path().join("deck.pptx.size")).unwrap();
    assert_eq!(size.trim(), "1920x1080");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 slides"), "stdout: {}", stdout);
}

#[test]
fn test_generate_without_api_key_fails() {
    // An empty directory, so no .env file supplies a key
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_command_in(temp_dir.path(), &["generate", "-p", "5枚のスライド"]);
    assert!(!output.status.success(), "Command unexpectedly succeeded");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "stderr: {}", stderr);
}

#[cfg(unix)]
#[test]
fn test_dotenv_file_configures_builder() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let script = common::write_fake_builder(temp_dir.path());
    fs::write(
        temp_dir.path().join(".env"),
        format!(
            "POM_BUILDER_PROGRAM=sh\nPOM_BUILDER_SCRIPT={}\nPROMPT2PPTX_CANVAS=1600x900\n",
            script.display()
        ),
    )
    .expect("Failed to write .env");
    fs::write(temp_dir.path().join("deck.json"), common::slides_json(1))
        .expect("Failed to write document");

    let output = run_command_in(temp_dir.path(), &["build", "-i", "deck.json", "-o", "deck.pptx"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(temp_dir.path().join("deck.pptx").exists(), "Output file was not created");

    let size = fs::read_to_string(temp_dir.path().join("deck.pptx.size")).unwrap();
    assert_eq!(size.trim(), "1600x900");
}
