//! Exit status of the compiled binary.

use std::process::Output;

use tempfile::{tempdir, TempDir};
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BIN: &str = env!("CARGO_BIN_EXE_piink-fetch");

/// Run the binary in an empty directory with only the given environment.
async fn run_with(dir: &TempDir, env: &[(&str, String)], args: &[&str]) -> Output {
    let mut command = Command::new(BIN);
    command.env_clear().current_dir(dir.path()).args(args);
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().await.unwrap()
}

async fn run_bin(dir: &TempDir, env: &[(&str, String)], extra_args: &[&str]) -> Output {
    let mut args = vec!["--no-log-file", "--quiet"];
    args.extend_from_slice(extra_args);
    run_with(dir, env, &args).await
}

fn full_env(server: &MockServer, dir: &TempDir) -> Vec<(&'static str, String)> {
    vec![
        ("HOST_URL", format!("{}/bucket/", server.uri())),
        ("IMG_URL", "out.jpg".to_string()),
        ("XML_URL", "dv_signage.xml".to_string()),
        ("OUT_FOLDER", dir.path().join("signage").display().to_string()),
        ("STAGING_DIR", dir.path().join("media").display().to_string()),
        ("WEBHOOK_URL", format!("{}/hook", server.uri())),
        ("PROBE_ADDRESS", server.address().to_string()),
        ("PROBE_ATTEMPTS", "1".to_string()),
    ]
}

async fn storage(image_status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bucket/out.jpg"))
        .respond_with(ResponseTemplate::new(image_status).set_body_bytes(b"\xff\xd8".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bucket/dv_signage.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<Image>out.jpg</Image>"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_each_missing_value_exits_1_without_network() {
    for missing in ["HOST_URL", "IMG_URL", "XML_URL", "OUT_FOLDER"] {
        // No routes: any request would be recorded
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();
        let env: Vec<_> = full_env(&server, &dir)
            .into_iter()
            .filter(|(key, _)| *key != missing)
            .collect();

        let output = run_bin(&dir, &env, &[]).await;
        assert_eq!(output.status.code(), Some(1), "missing {}", missing);
        assert!(
            String::from_utf8_lossy(&output.stderr).contains(missing),
            "stderr should name {}",
            missing
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_unreachable_probe_exits_1() {
    let server = storage(200).await;
    let dir = tempdir().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut env = full_env(&server, &dir);
    env.retain(|(key, _)| *key != "PROBE_ADDRESS");
    env.push(("PROBE_ADDRESS", closed));

    let output = run_bin(&dir, &env, &[]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("signage").exists());
}

#[tokio::test]
async fn test_success_exits_0() {
    let server = storage(200).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    let output = run_bin(
        &dir,
        &full_env(&server, &dir),
        &["--token", "20240101120000"],
    )
    .await;

    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("signage/20240101120000.jpg").exists());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("signage/dv_signage.xml")).unwrap(),
        "<Image>20240101120000.jpg</Image>"
    );
}

#[tokio::test]
async fn test_stage_failure_exit_code() {
    let server = storage(500).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let output = run_bin(&dir, &full_env(&server, &dir), &[]).await;
    assert_eq!(output.status.code(), Some(0));

    let dir = tempdir().unwrap();
    let output = run_bin(&dir, &full_env(&server, &dir), &["--strict"]).await;
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn test_strict_exit_from_environment() {
    let server = storage(500).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    for (value, expected) in [("1", 2), ("yes", 2), ("0", 0), ("off", 0)] {
        let dir = tempdir().unwrap();
        let mut env = full_env(&server, &dir);
        env.push(("STRICT_EXIT", value.to_string()));

        let output = run_bin(&dir, &env, &[]).await;
        assert_eq!(
            output.status.code(),
            Some(expected),
            "STRICT_EXIT={}: {}",
            value,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[tokio::test]
async fn test_log_file_is_appended() {
    let server = storage(200).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    let log = dir.path().join("logs/piink.log");
    let mut env = full_env(&server, &dir);
    env.push(("LOG_FILE", log.display().to_string()));

    for token in ["20240101120000", "20240101120001"] {
        let output = run_with(&dir, &env, &["--quiet", "--token", token]).await;
        assert_eq!(output.status.code(), Some(0));
    }

    let contents = std::fs::read_to_string(&log).unwrap();
    let starts: Vec<_> = contents
        .lines()
        .filter(|line| line.contains("Starting signage update"))
        .collect();
    assert_eq!(starts.len(), 2);
    assert!(starts.iter().all(|line| line.contains("INFO")));
    assert!(contents.contains("20240101120000"));
    assert!(contents.contains("20240101120001"));
    // Plain text, no terminal colours
    assert!(!contents.contains('\u{1b}'));
}

#[tokio::test]
async fn test_unopenable_log_file_warns_and_continues() {
    let server = storage(200).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    // A directory cannot be opened for appending
    let mut env = full_env(&server, &dir);
    env.push(("LOG_FILE", dir.path().display().to_string()));

    let output = run_with(&dir, &env, &["--quiet", "--token", "20240101120000"]).await;

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not open log file"));
    assert!(dir.path().join("signage/20240101120000.jpg").exists());
}
