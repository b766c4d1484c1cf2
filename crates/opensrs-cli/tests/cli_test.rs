use std::process::Command;

fn binary() -> &'static str {
    env!("CARGO_BIN_EXE_opensrs")
}

#[test]
fn check_accepts_sample_config() {
    let config_path = format!("{}/config/sample.yaml", env!("CARGO_MANIFEST_DIR"));

    let output = Command::new(binary())
        .arg("--config")
        .arg(config_path)
        .arg("check")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to start opensrs binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn check_without_config_fails() {
    let output = Command::new(binary())
        .arg("check")
        .output()
        .expect("Failed to start opensrs binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--config"));
}

#[test]
fn sign_prints_signature() {
    let body_path =
        std::env::temp_dir().join(format!("opensrs-body-{}.xml", std::process::id()));
    std::fs::write(&body_path, "<OPS_envelope/>").expect("write body");

    let output = Command::new(binary())
        .args(["sign", "--key", "k"])
        .arg(&body_path)
        .output()
        .expect("Failed to start opensrs binary");
    std::fs::remove_file(&body_path).ok();

    assert!(output.status.success());
    let signature = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(
        signature,
        opensrs_client::http::signature::sign("<OPS_envelope/>", "k")
    );
}
