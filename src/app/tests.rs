use super::*;
use crate::camera::mock::{MockCameraLog, MockFrameSource};
use crate::capture::mock::RecordingAssembler;
use crate::config::GifcamConfig;
use crate::connectivity::mock::MockProbe;
use crate::controls::mock::MockControl;
use crate::feedback::mock::{recording_indicators, IndicatorLogs};
use crate::upload::mock::MockUploader;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn create_test_config(dir: &TempDir) -> GifcamConfig {
    let mut config = GifcamConfig::default();
    config.capture.output_dir = dir.path().join("gifs").display().to_string();
    config.capture.work_dir = dir.path().join("work").display().to_string();
    config.capture.frame_count = 3;
    config.control.tick_interval_ms = 1;
    config.feedback.short_blink_ms = 1;
    config.feedback.long_blink_ms = 1;
    config.feedback.capture_ack_ms = 1;
    config
}

struct Fixture {
    orchestrator: GifcamOrchestrator,
    shutter: MockControl,
    camera_log: Arc<Mutex<MockCameraLog>>,
    indicator_logs: IndicatorLogs,
}

fn create_fixture(dir: &TempDir, connected: bool) -> Fixture {
    let camera = MockFrameSource::new();
    let camera_log = camera.log();
    let shutter = MockControl::new("shutter");
    let (indicators, indicator_logs) = recording_indicators();

    let orchestrator = GifcamOrchestrator::from_components(
        create_test_config(dir),
        Components {
            camera: Box::new(camera),
            assembler: Box::new(RecordingAssembler::new()),
            uploader: Box::new(MockUploader::new()),
            probe: Box::new(MockProbe::always(connected)),
            indicators,
            shutter: Box::new(shutter.clone()),
            upload_button: Box::new(MockControl::new("upload")),
        },
    );

    Fixture {
        orchestrator,
        shutter,
        camera_log,
        indicator_logs,
    }
}

#[test]
fn test_system_state_allows_one_activity() {
    let mut state = SystemState::new();
    assert_eq!(state.mode(), Mode::Idle);
    assert!(!state.wifi_connected());
    assert!(state.last_wifi_check().is_none());

    assert!(state.begin(Mode::Capturing));
    assert!(!state.begin(Mode::Uploading));
    assert_eq!(state.mode(), Mode::Capturing);

    state.finish();
    assert!(state.begin(Mode::Uploading));
}

#[test]
fn test_shutdown_handle_keeps_first_reason() {
    let handle = ShutdownHandle::new(tokio_util::sync::CancellationToken::new());
    assert!(!handle.is_requested());

    handle.request(ShutdownReason::Signal("SIGTERM".to_string()));
    handle.request(ShutdownReason::UserRequest);

    assert!(handle.is_requested());
    assert_eq!(
        handle.reason(),
        Some(ShutdownReason::Signal("SIGTERM".to_string()))
    );
}

#[tokio::test]
async fn test_start_shows_ready_with_connectivity_off() {
    let dir = TempDir::new().unwrap();
    let mut fixture = create_fixture(&dir, true);

    fixture.orchestrator.start().await.unwrap();

    assert!(fixture.camera_log.lock().started);
    assert_eq!(
        fixture.indicator_logs.connectivity.lock().history,
        vec![crate::feedback::LedPattern::Off]
    );
    assert_eq!(
        fixture.indicator_logs.busy.lock().last(),
        Some(&crate::feedback::LedPattern::Steady(1.0))
    );
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut fixture = create_fixture(&dir, false);
    fixture.orchestrator.start().await.unwrap();

    assert_eq!(fixture.orchestrator.shutdown().await.unwrap(), 0);
    assert_eq!(fixture.orchestrator.shutdown().await.unwrap(), 0);

    assert!(fixture.orchestrator.is_released());
    assert_eq!(fixture.camera_log.lock().stop_calls, 1);
    assert!(fixture.indicator_logs.ready.lock().released);
    assert!(fixture.indicator_logs.upload.lock().released);
}

#[tokio::test]
async fn test_run_stops_on_request_and_releases() {
    let dir = TempDir::new().unwrap();
    let mut fixture = create_fixture(&dir, true);
    fixture.orchestrator.start().await.unwrap();

    let handle = fixture.orchestrator.shutdown_handle();
    let shutter = fixture.shutter.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutter.press();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.request(ShutdownReason::UserRequest);
    });

    let exit_code = tokio::time::timeout(Duration::from_secs(5), fixture.orchestrator.run())
        .await
        .expect("run did not stop")
        .unwrap();

    assert_eq!(exit_code, 0);
    assert!(fixture.orchestrator.is_released());
    assert_eq!(fixture.orchestrator.state().mode(), Mode::Idle);
    assert!(fixture.orchestrator.state().wifi_connected());

    // One press, one session of three frames
    assert_eq!(fixture.camera_log.lock().captured.len(), 3);
    assert_eq!(fixture.camera_log.lock().stop_calls, 1);
    assert!(fixture.indicator_logs.connectivity.lock().released);
}
