use assert_cmd::Command;

fn biblio() -> Command {
    let mut cmd = Command::cargo_bin("biblio").unwrap();
    cmd.env_remove("BIBLIO_ENV").env_remove("BIBLIO_CONFIG_DIR");
    cmd
}

#[test]
fn check_config_prints_defaults() {
    let dir = std::env::temp_dir().join(format!("biblio-cli-defaults-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let output = biblio()
        .args(["check-config", "--config-dir"])
        .arg(&dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "local");
    assert_eq!(settings["server"]["port"], 8080);
    assert_eq!(settings["store"]["seed_sample_data"], true);
}

#[test]
fn check_config_reads_overlay_files() {
    let dir = std::env::temp_dir().join(format!("biblio-cli-overlay-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("production.toml"), "[server]\nport = 80\n").unwrap();

    let output = biblio()
        .args(["--env", "production", "check-config", "--config-dir"])
        .arg(&dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "production");
    assert_eq!(settings["server"]["port"], 80);
}

#[test]
fn unknown_environment_fails() {
    let output = biblio()
        .args(["--env", "qa", "check-config"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
