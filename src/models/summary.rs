use serde::Serialize;
use std::fmt;

/// What a monitoring run did, reported once the loop has stopped.
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub disk:            String,
    pub led:             String,
    /// Detected changes, whether or not the LED write succeeded.
    pub activity_count:  u64,
    pub ticks:           u64,
    pub write_failures:  u64,
    pub started_at:      String,
    pub duration_ms:     u64,
}

impl fmt::Display for ActivitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shutting down. Total disk activities detected: {}", self.activity_count)?;
        write!(
            f,
            "  disk {} / led {}: {} ticks in {:.1}s, {} LED write failure{}",
            self.disk,
            self.led,
            self.ticks,
            self.duration_ms as f64 / 1000.0,
            self.write_failures,
            if self.write_failures == 1 { "" } else { "s" },
        )
    }
}
