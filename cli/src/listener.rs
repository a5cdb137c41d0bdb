//! Console rendering of engine notifications.

use catpoint_core::api::{AlarmStatus, StatusListener};
use std::io::Write;
use std::sync::Mutex;

pub const CAT_DETECTED_HEADER: &str = "DANGER - CAT DETECTED";
pub const NO_CAT_HEADER: &str = "Camera Feed - No Cats Detected";

pub fn camera_header(cat_detected: bool) -> &'static str {
    if cat_detected {
        CAT_DETECTED_HEADER
    } else {
        NO_CAT_HEADER
    }
}

/// Prints each notification as one line on the wrapped writer.
pub struct ConsoleListener {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleListener {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    fn emit(&self, line: std::fmt::Arguments<'_>) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            tracing::debug!("console listener write failed: {e}");
        }
    }
}

impl StatusListener for ConsoleListener {
    fn on_alarm_status_changed(&self, status: AlarmStatus) {
        self.emit(format_args!("* Alarm: {} ({})", status.description(), status));
    }

    fn on_cat_detected(&self, detected: bool) {
        self.emit(format_args!("* Camera: {}", camera_header(detected)));
    }

    fn on_sensor_status_changed(&self) {
        self.emit(format_args!("* Sensors updated"));
    }
}
