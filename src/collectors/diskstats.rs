use crate::error::{MonitorError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const DISKSTATS_PATH: &str = "/proc/diskstats";

/// Counters parsed from one line of /proc/diskstats.
/// Only used for diagnostics; change detection never looks at fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDiskstat {
    pub reads_completed:  u64,
    pub sectors_read:     u64,
    pub writes_completed: u64,
    pub sectors_written:  u64,
    pub ios_in_progress:  u64,
}

impl RawDiskstat {
    /// Parse `major minor name reads ...`; returns the device name with its counters.
    pub fn parse_line(line: &str) -> Option<(String, RawDiskstat)> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 14 { return None; }

        let stat = RawDiskstat {
            reads_completed:  parse(fields[3]),
            sectors_read:     parse(fields[5]),
            writes_completed: parse(fields[7]),
            sectors_written:  parse(fields[9]),
            ios_in_progress:  parse(fields[11]),
        };
        Some((fields[2].to_string(), stat))
    }
}

/// One device listed in the statistics source.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskEntry {
    pub name:      String,
    pub partition: bool,
    pub stat:      RawDiskstat,
}

/// Re-open `path` and return the first line containing `key`.
///
/// The match is a plain substring test: `sda` also matches `sda1` or any line
/// that mentions `sda`, so callers must pass keys that are unambiguous.
pub fn find_record(path: &Path, key: &str) -> Result<String> {
    let file = File::open(path).map_err(|source| MonitorError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    match find_in(BufReader::new(file), key) {
        Ok(Some(line)) => Ok(line),
        Ok(None) => Err(MonitorError::RecordNotFound { key: key.to_string(), path: path.to_path_buf() }),
        Err(source) => Err(MonitorError::SourceUnavailable { path: path.to_path_buf(), source }),
    }
}

/// Single top-to-bottom scan of `reader` for the first line containing `key`.
pub fn find_in<R: BufRead>(reader: R, key: &str) -> io::Result<Option<String>> {
    for chunk in reader.split(b'\n') {
        let chunk = chunk?;
        let line = String::from_utf8_lossy(&chunk);
        if line.contains(key) {
            return Ok(Some(line.into_owned()));
        }
    }
    Ok(None)
}

/// List every device in the statistics source, in file order.
pub fn list_devices(path: &Path) -> Result<Vec<DiskEntry>> {
    let content = std::fs::read_to_string(path).map_err(|source| MonitorError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let devices = content
        .lines()
        .filter_map(RawDiskstat::parse_line)
        .map(|(name, stat)| DiskEntry { partition: is_partition(&name), name, stat })
        .collect();
    Ok(devices)
}

fn parse(s: &str) -> u64 {
    s.parse().unwrap_or(0)
}

/// Returns true for partition entries like sda1, nvme0n1p1, mmcblk0p2.
pub fn is_partition(name: &str) -> bool {
    if name.starts_with("nvme") || name.starts_with("mmcblk") {
        return match name.rfind('p') {
            Some(idx) => {
                let tail = &name[idx + 1..];
                !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        };
    }
    if name.starts_with("md") || name.starts_with("dm-") || name.starts_with("loop") {
        return false;
    }
    let has_leading_alpha = name.chars().next().map(|c| c.is_alphabetic()).unwrap_or(false);
    if has_leading_alpha {
        let rest: String = name.chars().skip_while(|c| c.is_alphabetic()).collect();
        return !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit());
    }
    false
}
