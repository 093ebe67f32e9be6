#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const IDLE: &str = "\
   8       0 sda 1500 20 98000 700 800 30 64000 900 0 1200 1600 0 0 0 0 0 0
   8       1 sda1 1400 20 97000 650 790 30 63000 880 0 1100 1530 0 0 0 0 0 0
 259       0 nvme0n1 5000 0 400000 1000 3000 0 200000 2000 0 3000 3000 0 0 0 0 0 0
";

/// A fake /proc/diskstats plus a fake /sys/class/leds holding `led0`.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let led = dir.path().join("leds").join("led0");
        fs::create_dir_all(&led).unwrap();
        fs::write(led.join("brightness"), "0\n").unwrap();
        fs::write(led.join("max_brightness"), "255\n").unwrap();
        fs::write(led.join("trigger"), "[none] mmc0 timer\n").unwrap();
        fs::write(dir.path().join("diskstats"), IDLE).unwrap();
        Sandbox { dir }
    }

    pub fn diskstats(&self) -> PathBuf {
        self.dir.path().join("diskstats")
    }

    pub fn leds_dir(&self) -> PathBuf {
        self.dir.path().join("leds")
    }

    pub fn brightness(&self) -> PathBuf {
        self.leds_dir().join("led0").join("brightness")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `--diskstats` / `--leds-dir` arguments pointing into the sandbox.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--diskstats".into(),
            self.diskstats().to_string_lossy().into_owned(),
            "--leds-dir".into(),
            self.leds_dir().to_string_lossy().into_owned(),
        ]
    }

    pub fn remove_diskstats(&self) {
        fs::remove_file(self.diskstats()).unwrap();
    }

    pub fn remove_brightness(&self) {
        fs::remove_file(self.brightness()).unwrap();
    }

    /// Bump the sda read counter so its line fingerprints differently.
    pub fn bump_sda(&self, reads: u64) {
        let content = IDLE.replace("sda 1500", &format!("sda {}", reads));
        fs::write(self.diskstats(), content).unwrap();
    }
}
