use crate::error::{MonitorError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Something with a brightness knob: positive lights it, zero turns it off.
pub trait Actuator {
    fn set_brightness(&mut self, value: u32) -> Result<()>;
}

/// An LED class device driven through its sysfs `brightness` node.
#[derive(Debug, Clone)]
pub struct SysfsLed {
    name:            String,
    brightness_path: PathBuf,
}

impl SysfsLed {
    pub fn new(leds_dir: &Path, name: &str) -> Self {
        Self {
            name:            name.to_string(),
            brightness_path: leds_dir.join(name).join("brightness"),
        }
    }

    pub fn brightness_path(&self) -> &Path { &self.brightness_path }

    /// Open the control node for reading to prove it exists.
    pub fn probe(&self) -> Result<()> {
        File::open(&self.brightness_path).map(|_| ()).map_err(|_| {
            let root = self.brightness_path
                .parent()
                .and_then(Path::parent)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            MonitorError::Configuration(format!("LED '{}' not found in {}/", self.name, root))
        })
    }
}

impl Actuator for SysfsLed {
    fn set_brightness(&mut self, value: u32) -> Result<()> {
        // No create: a vanished LED must fail, not leave a regular file behind.
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.brightness_path)
            .and_then(|mut f| writeln!(f, "{}", value))
            .map_err(|source| MonitorError::ActuatorWriteFailure {
                path: self.brightness_path.clone(),
                value,
                source,
            })
    }
}

/// Light the LED, hold for `width`, then turn it off.
///
/// The off write happens even when the on write failed, so a pulse never
/// leaves the LED lit. The first failure is returned.
pub fn pulse<A: Actuator + ?Sized>(actuator: &mut A, on_value: u32, width: Duration) -> Result<()> {
    let on = actuator.set_brightness(on_value);
    thread::sleep(width);
    let off = actuator.set_brightness(0);
    on.and(off)
}
