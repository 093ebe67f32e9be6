use std::fs;
use std::path::Path;

pub const LEDS_DIR: &str = "/sys/class/leds";

/// An LED class device exposed under /sys/class/leds.
#[derive(Debug, Clone, PartialEq)]
pub struct LedInfo {
    pub name:           String,
    pub brightness:     Option<u32>,
    pub max_brightness: Option<u32>,
    /// Active kernel trigger (the entry shown in [brackets]), if any.
    pub trigger:        Option<String>,
}

/// Enumerate LEDs under `root`, sorted by name. Missing root → empty list.
pub fn list_leds(root: &Path) -> Vec<LedInfo> {
    let mut leds: Vec<LedInfo> = match fs::read_dir(root) {
        Ok(entries) => entries
            .flatten()
            .filter(|ent| ent.path().join("brightness").exists())
            .map(|ent| {
                let dir = ent.path();
                LedInfo {
                    name:           ent.file_name().to_string_lossy().into_owned(),
                    brightness:     read_u32(&dir.join("brightness")),
                    max_brightness: read_u32(&dir.join("max_brightness")),
                    trigger:        fs::read_to_string(dir.join("trigger")).ok().and_then(|t| active_trigger(&t)),
                }
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    leds.sort_by(|a, b| a.name.cmp(&b.name));
    leds
}

fn read_u32(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// `none [disk-activity] timer` → `disk-activity`
fn active_trigger(text: &str) -> Option<String> {
    text.split_whitespace()
        .find_map(|t| t.strip_prefix('[').and_then(|t| t.strip_suffix(']')))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_led(root: &Path, name: &str, brightness: &str, trigger: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("brightness"), brightness).unwrap();
        fs::write(dir.join("max_brightness"), "255\n").unwrap();
        if let Some(t) = trigger {
            fs::write(dir.join("trigger"), t).unwrap();
        }
    }

    #[test]
    fn lists_leds_sorted_with_attributes() {
        let root = TempDir::new().unwrap();
        make_led(root.path(), "led1", "0\n", Some("none [mmc0] timer\n"));
        make_led(root.path(), "input0::capslock", "1\n", None);
        fs::create_dir_all(root.path().join("not-an-led")).unwrap();

        let leds = list_leds(root.path());
        assert_eq!(leds.len(), 2);
        assert_eq!(leds[0].name, "input0::capslock");
        assert_eq!(leds[0].brightness, Some(1));
        assert_eq!(leds[0].trigger, None);
        assert_eq!(leds[1].name, "led1");
        assert_eq!(leds[1].max_brightness, Some(255));
        assert_eq!(leds[1].trigger.as_deref(), Some("mmc0"));
    }

    #[test]
    fn missing_root_is_empty() {
        assert!(list_leds(Path::new("/nonexistent/leds")).is_empty());
    }

    #[test]
    fn trigger_without_selection() {
        assert_eq!(active_trigger("none timer heartbeat"), None);
        assert_eq!(active_trigger("[none] timer").as_deref(), Some("none"));
    }
}
