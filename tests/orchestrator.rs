use gifcam::app::{Components, GifcamOrchestrator, Mode, TickOutcome};
use gifcam::camera::mock::MockFrameSource;
use gifcam::capture::mock::RecordingAssembler;
use gifcam::config::GifcamConfig;
use gifcam::connectivity::mock::MockProbe;
use gifcam::controls::mock::MockControl;
use gifcam::feedback::mock::{recording_indicators, IndicatorLogs};
use gifcam::feedback::{IndicatorTarget, LedPattern};
use gifcam::upload::mock::{MockUploader, UploadCall};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct Rig {
    orchestrator: GifcamOrchestrator,
    shutter: MockControl,
    upload: MockControl,
    probe: MockProbe,
    uploads: Arc<Mutex<Vec<UploadCall>>>,
    indicators: IndicatorLogs,
    output_dir: String,
    work_dir: String,
}

fn create_rig(dir: &TempDir, probe: MockProbe, camera: MockFrameSource, uploader: MockUploader) -> Rig {
    let mut config = GifcamConfig::default();
    config.capture.output_dir = dir.path().join("gifs").display().to_string();
    config.capture.work_dir = dir.path().join("work").display().to_string();
    config.capture.frame_count = 4;
    config.control.debounce_ms = 0;
    config.feedback.short_blink_ms = 1;
    config.feedback.long_blink_ms = 2;
    config.feedback.capture_ack_ms = 1;

    let shutter = MockControl::new("shutter");
    let upload = MockControl::new("upload");
    let uploads = uploader.calls();
    let (indicator_outputs, indicators) = recording_indicators();
    let output_dir = config.capture.output_dir.clone();
    let work_dir = config.capture.work_dir.clone();

    let orchestrator = GifcamOrchestrator::from_components(
        config,
        Components {
            camera: Box::new(camera),
            assembler: Box::new(RecordingAssembler::new()),
            uploader: Box::new(uploader),
            probe: Box::new(probe.clone()),
            indicators: indicator_outputs,
            shutter: Box::new(shutter.clone()),
            upload_button: Box::new(upload.clone()),
        },
    );

    Rig {
        orchestrator,
        shutter,
        upload,
        probe,
        uploads,
        indicators,
        output_dir,
        work_dir,
    }
}

fn staged_sessions(work_dir: &str) -> usize {
    std::fs::read_dir(work_dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_upload_without_connectivity_renders_alert_once() {
    let dir = TempDir::new().unwrap();
    let mut rig = create_rig(
        &dir,
        MockProbe::always(false),
        MockFrameSource::new(),
        MockUploader::new(),
    );
    rig.orchestrator.start().await.unwrap();

    rig.upload.press();
    let outcome = rig.orchestrator.tick().await;
    rig.upload.release();

    assert!(matches!(outcome, TickOutcome::UploadBlocked));
    assert!(rig.uploads.lock().is_empty());
    assert_eq!(rig.orchestrator.feedback().alerts_rendered(), 1);
    assert_eq!(rig.indicators.ready.lock().on_count(), 9);
    assert_eq!(rig.indicators.upload.lock().on_count(), 0);
    assert_eq!(
        rig.indicators.connectivity.lock().last(),
        Some(&LedPattern::Off)
    );
}

#[tokio::test]
async fn test_capture_then_upload() {
    let dir = TempDir::new().unwrap();
    let mut rig = create_rig(
        &dir,
        MockProbe::always(true),
        MockFrameSource::new(),
        MockUploader::new().failing_on("a.gif"),
    );
    rig.orchestrator.start().await.unwrap();

    rig.shutter.press();
    let artifact = match rig.orchestrator.tick().await {
        TickOutcome::Captured(artifact) => artifact,
        other => panic!("Expected capture, got {:?}", other),
    };
    rig.shutter.release();

    assert_eq!(artifact.frame_count, 4);
    assert!(artifact.path.starts_with(&rig.output_dir));
    assert_eq!(staged_sessions(&rig.work_dir), 0);
    assert_eq!(
        rig.indicators.connectivity.lock().last(),
        Some(&LedPattern::Steady(1.0))
    );

    let out = Path::new(&rig.output_dir);
    std::fs::write(out.join("a.gif"), b"a").unwrap();
    std::fs::write(out.join("c.txt"), b"c").unwrap();

    rig.upload.press();
    let report = match rig.orchestrator.tick().await {
        TickOutcome::Uploaded(report) => report,
        other => panic!("Expected upload, got {:?}", other),
    };
    rig.upload.release();

    let artifact_name = artifact
        .path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert_eq!(report.failed, vec!["a.gif".to_string()]);
    assert_eq!(report.uploaded, vec![artifact_name]);
    assert_eq!(report.skipped, vec!["c.txt".to_string()]);
    assert_eq!(rig.uploads.lock().len(), 2);

    // Artifacts stay on disk after upload
    assert!(artifact.path.exists());
    assert_eq!(rig.orchestrator.state().mode(), Mode::Idle);
    assert_eq!(
        rig.orchestrator.feedback().current(IndicatorTarget::Upload),
        Some(&LedPattern::Off)
    );
}

#[tokio::test]
async fn test_held_shutter_captures_once() {
    let dir = TempDir::new().unwrap();
    let mut rig = create_rig(
        &dir,
        MockProbe::always(true),
        MockFrameSource::new(),
        MockUploader::new(),
    );
    rig.orchestrator.start().await.unwrap();

    rig.shutter.press();
    assert!(matches!(
        rig.orchestrator.tick().await,
        TickOutcome::Captured(_)
    ));
    for _ in 0..5 {
        assert!(matches!(rig.orchestrator.tick().await, TickOutcome::Idle));
    }

    rig.shutter.release();
    assert!(matches!(rig.orchestrator.tick().await, TickOutcome::Idle));
    rig.shutter.press();
    assert!(matches!(
        rig.orchestrator.tick().await,
        TickOutcome::Captured(_)
    ));
}

#[tokio::test]
async fn test_capture_failure_returns_to_idle() {
    let dir = TempDir::new().unwrap();
    let mut rig = create_rig(
        &dir,
        MockProbe::always(true),
        MockFrameSource::new().failing_on(2),
        MockUploader::new(),
    );
    rig.orchestrator.start().await.unwrap();

    rig.shutter.press();
    let outcome = rig.orchestrator.tick().await;
    rig.shutter.release();

    assert!(matches!(outcome, TickOutcome::CaptureFailed(_)));
    assert_eq!(staged_sessions(&rig.work_dir), 0);
    assert_eq!(rig.orchestrator.state().mode(), Mode::Idle);
    assert!(matches!(rig.orchestrator.tick().await, TickOutcome::Idle));
    assert_eq!(
        rig.orchestrator.feedback().current(IndicatorTarget::Busy),
        Some(&LedPattern::Steady(1.0))
    );
}

#[tokio::test]
async fn test_connectivity_is_probed_once_per_interval() {
    let dir = TempDir::new().unwrap();
    let mut rig = create_rig(
        &dir,
        MockProbe::new([true, false]),
        MockFrameSource::new(),
        MockUploader::new(),
    );
    rig.orchestrator.start().await.unwrap();

    for _ in 0..10 {
        rig.orchestrator.tick().await;
    }

    assert_eq!(rig.probe.calls(), 1);
    assert!(rig.orchestrator.state().wifi_connected());
    assert!(rig.orchestrator.state().last_wifi_check().is_some());
}
