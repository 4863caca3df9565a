//! CLI surface tests: flags parse and help text stays honest

use std::path::PathBuf;
use std::process::Command;

fn binary_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("target/debug/critiq");

    #[cfg(windows)]
    {
        path.set_extension("exe");
    }

    path
}

#[test]
fn help_lists_all_subcommands() {
    let output = Command::new(binary_path())
        .arg("--help")
        .output()
        .expect("failed to run critiq");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["watch", "rate", "init"] {
        assert!(stdout.contains(subcommand), "help missing '{subcommand}'");
    }
}

#[test]
fn version_flag_works() {
    let output = Command::new(binary_path())
        .arg("--version")
        .output()
        .expect("failed to run critiq");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("critiq"));
}

#[test]
fn watch_help_documents_debounce_and_persona() {
    let output = Command::new(binary_path())
        .args(["watch", "--help"])
        .output()
        .expect("failed to run critiq");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--persona"));
    assert!(stdout.contains("--debounce-ms"));
    assert!(stdout.contains("--quiet"));
}

#[test]
fn rate_requires_a_file_argument() {
    let output = Command::new(binary_path())
        .arg("rate")
        .output()
        .expect("failed to run critiq");
    assert!(!output.status.success());
}
