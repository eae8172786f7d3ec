use super::controller::Indicators;
use super::indicator::Indicator;
use super::pattern::LedPattern;
use crate::error::FeedbackError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Everything a [`RecordingIndicator`] was asked to show
#[derive(Debug, Default)]
pub struct IndicatorLog {
    pub history: Vec<LedPattern>,
    pub released: bool,
}

impl IndicatorLog {
    pub fn last(&self) -> Option<&LedPattern> {
        self.history.last()
    }

    /// Number of times the output was switched fully on
    pub fn on_count(&self) -> usize {
        self.history
            .iter()
            .filter(|p| **p == LedPattern::Steady(1.0))
            .count()
    }
}

/// Indicator that records patterns instead of driving a pin
#[derive(Clone)]
pub struct RecordingIndicator {
    name: String,
    log: Arc<Mutex<IndicatorLog>>,
    broken: bool,
}

impl RecordingIndicator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::new(Mutex::new(IndicatorLog::default())),
            broken: false,
        }
    }

    /// An indicator whose every write fails
    pub fn broken(name: &str) -> Self {
        Self {
            broken: true,
            ..Self::new(name)
        }
    }

    pub fn log(&self) -> Arc<Mutex<IndicatorLog>> {
        Arc::clone(&self.log)
    }
}

impl Indicator for RecordingIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    fn show(&mut self, pattern: &LedPattern) -> Result<(), FeedbackError> {
        if self.broken {
            return Err(FeedbackError::Output {
                indicator: self.name.clone(),
                details: "simulated failure".to_string(),
            });
        }
        if pattern.is_timed() {
            return Err(FeedbackError::NotStatic {
                indicator: self.name.clone(),
            });
        }
        self.log.lock().history.push(pattern.clone());
        Ok(())
    }

    fn release(&mut self) -> Result<(), FeedbackError> {
        let mut log = self.log.lock();
        log.history.push(LedPattern::Off);
        log.released = true;
        Ok(())
    }
}

/// Logs for the four recording indicators, in target order
pub struct IndicatorLogs {
    pub busy: Arc<Mutex<IndicatorLog>>,
    pub ready: Arc<Mutex<IndicatorLog>>,
    pub connectivity: Arc<Mutex<IndicatorLog>>,
    pub upload: Arc<Mutex<IndicatorLog>>,
}

/// Four recording indicators plus handles to inspect them
pub fn recording_indicators() -> (Indicators, IndicatorLogs) {
    let busy = RecordingIndicator::new("busy");
    let ready = RecordingIndicator::new("ready");
    let connectivity = RecordingIndicator::new("connectivity");
    let upload = RecordingIndicator::new("upload");

    let logs = IndicatorLogs {
        busy: busy.log(),
        ready: ready.log(),
        connectivity: connectivity.log(),
        upload: upload.log(),
    };

    let indicators = Indicators {
        busy: Box::new(busy),
        ready: Box::new(ready),
        connectivity: Box::new(connectivity),
        upload: Box::new(upload),
    };

    (indicators, logs)
}
