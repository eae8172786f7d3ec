use super::mock::MockControl;
use super::*;
use crate::config::TriggerMode;
use std::time::Duration;
use tokio::time::Instant;

fn monitor(mode: TriggerMode, debounce_ms: u64) -> (ButtonMonitor, MockControl) {
    let control = MockControl::new("shutter");
    let monitor = ButtonMonitor::new(
        Box::new(control.clone()),
        mode,
        Duration::from_millis(debounce_ms),
    );
    (monitor, control)
}

#[test]
fn test_edge_trigger_fires_once_per_press() {
    let (mut monitor, control) = monitor(TriggerMode::Edge, 50);
    let start = Instant::now();

    assert!(!monitor.poll(start));

    control.press();
    assert!(monitor.poll(start + Duration::from_millis(100)));
    // Holding does not retrigger
    assert!(!monitor.poll(start + Duration::from_millis(200)));
    assert!(!monitor.poll(start + Duration::from_millis(300)));

    control.release();
    assert!(!monitor.poll(start + Duration::from_millis(400)));
    control.press();
    assert!(monitor.poll(start + Duration::from_millis(500)));

    assert_eq!(monitor.activations(), 2);
}

#[test]
fn test_edge_trigger_ignores_bounce() {
    let (mut monitor, control) = monitor(TriggerMode::Edge, 50);
    let start = Instant::now();

    control.press();
    assert!(monitor.poll(start));
    control.release();
    assert!(!monitor.poll(start + Duration::from_millis(5)));
    control.press();
    assert!(!monitor.poll(start + Duration::from_millis(10)));

    assert_eq!(monitor.activations(), 1);
}

#[test]
fn test_level_trigger_repeats_while_held() {
    let (mut monitor, control) = monitor(TriggerMode::Level, 50);
    let start = Instant::now();

    control.press();
    assert!(monitor.poll(start));
    // Inside the debounce window
    assert!(!monitor.poll(start + Duration::from_millis(20)));
    assert!(monitor.poll(start + Duration::from_millis(60)));
    assert!(monitor.poll(start + Duration::from_millis(120)));

    control.release();
    assert!(!monitor.poll(start + Duration::from_millis(200)));
    assert_eq!(monitor.activations(), 3);
}

#[test]
fn test_zero_debounce_accepts_every_edge() {
    let (mut monitor, control) = monitor(TriggerMode::Edge, 0);
    let now = Instant::now();

    for _ in 0..3 {
        control.press();
        assert!(monitor.poll(now));
        control.release();
        assert!(!monitor.poll(now));
    }
    assert_eq!(monitor.name(), "shutter");
}
