use std::fs;

use clap::Parser;
use tempfile::TempDir;
use treeshell::error::ShellError;
use treeshell::tooling::cli::{Cli, CliContext, Commands};

fn context_with_config(temp_dir: &TempDir, toml: &str, extra: &[&str]) -> CliContext {
    let config_path = temp_dir.path().join("treeshell.toml");
    fs::write(&config_path, toml).unwrap();
    let mut args = vec![
        "treeshell".to_string(),
        "--config".to_string(),
        config_path.display().to_string(),
    ];
    args.extend(extra.iter().map(|a| a.to_string()));
    let cli = Cli::try_parse_from(args).unwrap();
    CliContext::new(&cli).unwrap()
}

#[test]
fn config_command_prints_effective_toml() {
    let temp_dir = TempDir::new().unwrap();
    let context = context_with_config(&temp_dir, "retention_secs = 30\n", &["--no-color"]);

    let output = context.execute(&Commands::Config).unwrap();
    let parsed: toml::Value = toml::from_str(&output).unwrap();
    assert_eq!(parsed["retention_secs"].as_integer(), Some(30));
    assert_eq!(parsed["color"].as_bool(), Some(false));
    assert!(parsed.get("logging").is_some());
}

#[test]
fn cli_flag_overrides_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let context = context_with_config(
        &temp_dir,
        "retention_secs = 30\n",
        &["--retention-secs", "7", "--user", "ann"],
    );
    assert_eq!(context.config().retention_secs, 7);
    assert_eq!(context.user(), "ann");
}

#[test]
fn invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "reap_interval_ms = 0\n").unwrap();
    let cli = Cli::try_parse_from([
        "treeshell",
        "--config",
        config_path.to_str().unwrap(),
    ])
    .unwrap();
    assert!(CliContext::new(&cli).is_err());
}

#[test]
fn run_replays_script_file() {
    let temp_dir = TempDir::new().unwrap();
    let context = context_with_config(&temp_dir, "", &["--no-color"]);
    let script = temp_dir.path().join("setup.txt");
    fs::write(&script, "mkdir docs\ncd docs\ncat a\nhello\n:q\nrm a\nexit\nmkdir never\n").unwrap();

    let name = temp_dir.path().join("setup");
    let output = context
        .execute(&Commands::Run {
            script: name.display().to_string(),
            yes: true,
        })
        .unwrap();
    assert!(output.contains("finished"));
}

#[test]
fn run_with_missing_script_fails() {
    let temp_dir = TempDir::new().unwrap();
    let context = context_with_config(&temp_dir, "", &["--no-color"]);
    let name = temp_dir.path().join("nowhere");

    let err = context
        .execute(&Commands::Run {
            script: name.display().to_string(),
            yes: true,
        })
        .unwrap_err();
    match err {
        ShellError::Io(path, source) => {
            assert_eq!(path, name);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected {:?}", other),
    }
}
