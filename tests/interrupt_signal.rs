//! Ctrl+C handling against real SIGINT delivery.
//!
//! These tests signal the whole test process, so they live in their own
//! test binary and run one at a time.

#![cfg(unix)]

use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

use curlfetch::core::config::Config;
use curlfetch::{Downloader, FetchError};
use tempfile::TempDir;

static SIGNALS: Mutex<()> = Mutex::new(());

fn fake_curl(dir: &TempDir, body: &str) -> Config {
    let script = dir.path().join("fake-curl.sh");
    std::fs::write(&script, body).unwrap();
    Config {
        curl_path: "sh".to_string(),
        extra_args: vec![script.to_string_lossy().into_owned()],
        follow_redirects: false,
        kill_on_interrupt: true,
        show_progress: false,
    }
}

fn send_sigint_to_self() {
    let status = Command::new("kill")
        .args(["-INT", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());
}

#[tokio::test]
async fn test_sigint_during_transfer_wins_over_exit_zero() {
    let _serial = SIGNALS.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let config = fake_curl(&dir, "kill -INT $PPID\nexit 0\n");

    let mut downloader =
        Downloader::new("https://example.com/f.iso", dir.path().join("f.iso")).with_config(config);

    assert!(matches!(
        downloader.download().await,
        Err(FetchError::Interrupted)
    ));
}

#[tokio::test]
async fn test_sigint_between_calls_does_not_reach_next_download() {
    let _serial = SIGNALS.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let config = fake_curl(&dir, "exit 0\n");

    let mut downloader =
        Downloader::new("https://example.com/f.iso", dir.path().join("f.iso")).with_config(config);

    // The first call installs the process-wide handler, so the signal below
    // is caught instead of terminating the test binary.
    downloader.download().await.unwrap();

    send_sigint_to_self();
    tokio::time::sleep(Duration::from_millis(100)).await;

    downloader.download().await.unwrap();
}
