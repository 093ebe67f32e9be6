use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, MonitorError>;

/// Everything that can go wrong between reading diskstats and blinking the LED.
///
/// Only `Configuration` is fatal; the loop absorbs the others tick by tick.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("cannot read {path}: {source}")]
    SourceUnavailable {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("disk '{key}' not found in {path}")]
    RecordNotFound {
        key:  String,
        path: PathBuf,
    },

    #[error("failed to write brightness {value} to {path}: {source}")]
    ActuatorWriteFailure {
        path:   PathBuf,
        value:  u32,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_names_the_disk() {
        let missing = MonitorError::RecordNotFound { key: "sda".into(), path: "/proc/diskstats".into() };
        assert_eq!(missing.to_string(), "disk 'sda' not found in /proc/diskstats");
    }

    #[test]
    fn messages_name_the_path() {
        let err = MonitorError::ActuatorWriteFailure {
            path:   "/sys/class/leds/led0/brightness".into(),
            value:  1,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/sys/class/leds/led0/brightness"));
        assert!(msg.contains("denied"));
    }
}
