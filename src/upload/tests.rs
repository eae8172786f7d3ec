use super::mock::MockUploader;
use super::*;
use crate::config::{GifcamConfig, UploadConfig};
use crate::error::UploadError;
use crate::feedback::mock::recording_indicators;
use crate::feedback::{FeedbackController, FeedbackState, IndicatorTarget, LedPattern};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn feedback() -> FeedbackController {
    let (indicators, _logs) = recording_indicators();
    FeedbackController::new(indicators, &GifcamConfig::default().feedback)
}

fn populate(dir: &TempDir, files: &[&str]) {
    for name in files {
        std::fs::write(dir.path().join(name), name.as_bytes()).unwrap();
    }
}

#[test]
fn test_remote_path_joins_once() {
    assert_eq!(remote_path("/gifcam", "a.gif"), "/gifcam/a.gif");
    assert_eq!(remote_path("/gifcam/", "a.gif"), "/gifcam/a.gif");
}

#[test]
fn test_api_arg_is_ascii_json() {
    let arg = DropboxUploader::api_arg("/gifcam/caf\u{e9}.gif");
    assert!(arg.is_ascii());
    assert!(arg.contains("caf\\u00e9.gif"));

    let parsed: serde_json::Value = serde_json::from_str(&arg).unwrap();
    assert_eq!(parsed["path"], "/gifcam/caf\u{e9}.gif");
    assert_eq!(parsed["mode"], "overwrite");
    assert_eq!(parsed["autorename"], false);
}

#[tokio::test]
async fn test_only_artifacts_are_uploaded() {
    let dir = TempDir::new().unwrap();
    populate(&dir, &["a.gif", "b.GIF", "c.txt"]);
    std::fs::create_dir(dir.path().join("metadata.gif")).unwrap();

    let uploader = MockUploader::new();
    let calls = uploader.calls();
    let dispatcher = UploadDispatcher::new(Box::new(uploader), "gif");

    let report = dispatcher
        .upload_all(dir.path(), "/gifcam", &mut feedback())
        .await
        .unwrap();

    assert_eq!(report.uploaded, vec!["a.gif", "b.GIF"]);
    assert_eq!(report.skipped, vec!["c.txt"]);
    assert!(report.failed.is_empty());

    let paths: Vec<String> = calls.lock().iter().map(|c| c.remote_path.clone()).collect();
    assert_eq!(paths, vec!["/gifcam/a.gif", "/gifcam/b.GIF"]);
    assert_eq!(calls.lock()[0].size, "a.gif".len());
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_artifacts_are_uploaded() {
    let dir = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    std::fs::write(elsewhere.path().join("real.gif"), b"GIF89a").unwrap();
    std::os::unix::fs::symlink(
        elsewhere.path().join("real.gif"),
        dir.path().join("linked.gif"),
    )
    .unwrap();
    std::os::unix::fs::symlink(
        elsewhere.path().join("missing.gif"),
        dir.path().join("dangling.gif"),
    )
    .unwrap();

    let uploader = MockUploader::new();
    let calls = uploader.calls();
    let dispatcher = UploadDispatcher::new(Box::new(uploader), "gif");

    let report = dispatcher
        .upload_all(dir.path(), "/gifcam", &mut feedback())
        .await
        .unwrap();

    assert_eq!(report.uploaded, vec!["linked.gif"]);
    assert_eq!(calls.lock()[0].size, b"GIF89a".len());
    assert_eq!(report.attempted(), 1);
}

#[tokio::test]
async fn test_one_failure_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    populate(&dir, &["a.gif", "b.gif"]);

    let uploader = MockUploader::new().failing_on("a.gif");
    let calls = uploader.calls();
    let dispatcher = UploadDispatcher::new(Box::new(uploader), "gif");
    let mut feedback = feedback();

    let report = dispatcher
        .upload_all(dir.path(), "/gifcam", &mut feedback)
        .await
        .unwrap();

    assert_eq!(report.failed, vec!["a.gif"]);
    assert_eq!(report.uploaded, vec!["b.gif"]);
    assert_eq!(report.attempted(), 2);
    assert_eq!(calls.lock().len(), 2);
    assert_eq!(feedback.state(), FeedbackState::Ready);
    assert_eq!(
        feedback.current(IndicatorTarget::Upload),
        Some(&LedPattern::Off)
    );
}

#[tokio::test]
async fn test_missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let dispatcher = UploadDispatcher::new(Box::new(MockUploader::new()), "gif");
    let mut feedback = feedback();

    let result = dispatcher
        .upload_all(&dir.path().join("missing"), "/gifcam", &mut feedback)
        .await;

    assert!(matches!(result, Err(UploadError::Read { .. })));
    assert_eq!(feedback.state(), FeedbackState::Ready);
}

/// Accept one request, hand back its head and body, answer with `status`
async fn serve_once(listener: TcpListener, status: &'static str) -> (String, Vec<u8>) {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = "{}";
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    socket.shutdown().await.ok();

    (head, buf[head_end..].to_vec())
}

fn upload_config(addr: std::net::SocketAddr, token: &str) -> UploadConfig {
    let mut config = GifcamConfig::default().upload;
    config.endpoint = format!("http://{}/2/files/upload", addr);
    config.access_token = token.to_string();
    config.request_timeout_seconds = 5;
    config
}

#[tokio::test]
async fn test_dropbox_request_shape() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_once(listener, "200 OK"));

    let uploader = DropboxUploader::new(&upload_config(addr, "secret-token")).unwrap();
    uploader
        .upload(b"GIF89a".to_vec(), "/gifcam/ABC-0.gif")
        .await
        .unwrap();

    let (head, body) = server.await.unwrap();
    let head_lower = head.to_lowercase();
    assert!(head.starts_with("POST /2/files/upload "));
    assert!(head_lower.contains("authorization: bearer secret-token"));
    assert!(head_lower.contains("content-type: application/octet-stream"));
    assert!(head.contains(r#""path":"/gifcam/ABC-0.gif""#));
    assert!(head.contains(r#""mode":"overwrite""#));
    assert_eq!(body, b"GIF89a");
}

#[tokio::test]
async fn test_dropbox_rejection_reports_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_once(listener, "409 Conflict"));

    let uploader = DropboxUploader::new(&upload_config(addr, "secret-token")).unwrap();
    let result = uploader.upload(vec![1, 2, 3], "/gifcam/x.gif").await;
    server.await.unwrap();

    match result {
        Err(UploadError::Rejected { status, path, .. }) => {
            assert_eq!(status, 409);
            assert_eq!(path, "/gifcam/x.gif");
        }
        other => panic!("Expected rejection, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_dropbox_without_token_is_not_configured() {
    let mut config = GifcamConfig::default().upload;
    config.access_token.clear();
    let uploader = DropboxUploader::new(&config).unwrap();

    let result = uploader.upload(vec![0], "/gifcam/x.gif").await;
    assert!(matches!(result, Err(UploadError::NotConfigured(_))));
}
