use super::mock::MockFrameSource;
use super::*;
use crate::config::{CameraBackend, CameraConfig, GifcamConfig, Rotation};
use image::GenericImageView;
use tempfile::TempDir;

fn create_test_camera_config() -> CameraConfig {
    let mut config = GifcamConfig::default().camera;
    config.backend = CameraBackend::StillCommand;
    config.still_command = "/nonexistent/rpicam-still".to_string();
    config
}

#[test]
fn test_camera_builder_validation() {
    let result = CameraInterfaceBuilder::new().build();
    assert!(result.is_err());

    if let Err(crate::error::GifcamError::System { message }) = result {
        assert!(message.contains("Camera configuration must be specified"));
    } else {
        panic!("Expected system error for missing configuration");
    }
}

#[test]
fn test_builder_selects_still_command_backend() {
    let source = CameraInterfaceBuilder::new()
        .config(create_test_camera_config())
        .build()
        .unwrap();
    assert_eq!(source.name(), "still_command");
}

#[test]
fn test_still_command_args() {
    let camera = StillCommandCamera::new(create_test_camera_config());
    let args = camera.command_args(std::path::Path::new("/tmp/0000.jpg"));

    assert!(args.windows(2).any(|w| w[0] == "--width" && w[1] == "540"));
    assert!(args.windows(2).any(|w| w[0] == "--height" && w[1] == "405"));
    assert!(args.windows(2).any(|w| w[0] == "--output" && w[1] == "/tmp/0000.jpg"));
}

#[tokio::test]
async fn test_still_command_requires_start() {
    let dir = TempDir::new().unwrap();
    let mut camera = StillCommandCamera::new(create_test_camera_config());

    let result = camera.capture_frame(&dir.path().join("0000.jpg")).await;
    assert!(matches!(result, Err(crate::error::CameraError::NotStarted)));
}

#[tokio::test]
async fn test_still_command_missing_binary_is_an_error() {
    let dir = TempDir::new().unwrap();
    let mut camera = StillCommandCamera::new(create_test_camera_config());
    camera.start().await.unwrap();

    let result = camera.capture_frame(&dir.path().join("0000.jpg")).await;
    assert!(matches!(
        result,
        Err(crate::error::CameraError::Command { .. })
    ));
}

#[test]
fn test_rotate_jpeg_swaps_dimensions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.jpg");
    image::RgbImage::new(40, 30).save(&path).unwrap();

    still_command::rotate_jpeg(&path, Rotation::Rotate90, 85).unwrap();

    let rotated = image::open(&path).unwrap();
    assert_eq!(rotated.dimensions(), (30, 40));
}

#[tokio::test]
async fn test_mock_frame_source_records_and_fails_on_request() {
    let dir = TempDir::new().unwrap();
    let mut source = MockFrameSource::new().failing_on(2);
    let log = source.log();

    source.start().await.unwrap();
    source.capture_frame(&dir.path().join("a.jpg")).await.unwrap();
    assert!(source.capture_frame(&dir.path().join("b.jpg")).await.is_err());
    source.stop().await.unwrap();

    let log = log.lock();
    assert_eq!(log.captured.len(), 1);
    assert_eq!(log.stop_calls, 1);
    assert_eq!(std::fs::read_to_string(dir.path().join("a.jpg")).unwrap(), "frame-1");
}
