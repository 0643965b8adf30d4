//! Sound bank
//!
//! Maps (device, on/off) pairs to WAV files found in one directory.
//! File names follow the `on<device>.wav` / `off<device>.wav` scheme,
//! case-insensitively; a device missing either switch is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex_lite::Regex;
use tracing::{debug, warn};

use crate::error::Result;

/// Switch position named by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    /// Parse an `x10.basic` command value
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "on" => Some(Switch::On),
            "off" => Some(Switch::Off),
            _ => None,
        }
    }
}

/// A device's sound pair, named as spelled on disk.
#[derive(Debug)]
struct DeviceSounds {
    name: String,
    on: PathBuf,
    off: PathBuf,
}

/// On/off sound pairs per device.
///
/// Device names are compared case-insensitively; the spelling of the
/// `on` file is kept for display and logging.
#[derive(Debug, Default)]
pub struct SoundBank {
    sounds: HashMap<String, DeviceSounds>,
}

impl SoundBank {
    /// Scan one directory (non-recursive) for sound pairs.
    ///
    /// Fails only if the directory cannot be read; unparseable file
    /// names are skipped and half-paired devices are dropped with a
    /// warning.
    pub fn scan(dir: &Path) -> Result<Self> {
        let pattern = Regex::new(r"(?i)^(on|off)([^.]+)\.wav$").unwrap();
        let mut partial: HashMap<String, (String, Option<PathBuf>, Option<PathBuf>)> =
            HashMap::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            let caps = match pattern.captures(name) {
                Some(caps) => caps,
                None => continue,
            };

            let device = caps[2].to_string();
            let slot = partial
                .entry(device.to_lowercase())
                .or_insert_with(|| (device.clone(), None, None));
            if caps[1].eq_ignore_ascii_case("on") {
                // display name follows the on file's spelling
                slot.0 = device;
                slot.1 = Some(path);
            } else {
                slot.2 = Some(path);
            }
        }

        let mut sounds = HashMap::new();
        for (key, (name, on, off)) in partial {
            match (on, off) {
                (Some(on), Some(off)) => {
                    debug!("sound bank: {} -> {}, {}", name, on.display(), off.display());
                    sounds.insert(key, DeviceSounds { name, on, off });
                }
                _ => warn!("ignoring device {}: needs both on and off sounds", name),
            }
        }

        Ok(Self { sounds })
    }

    /// Path of the sound for one device/switch pair, if the bank has it
    pub fn lookup(&self, device: &str, switch: Switch) -> Option<&Path> {
        self.sounds
            .get(&device.to_lowercase())
            .map(|pair| match switch {
                Switch::On => pair.on.as_path(),
                Switch::Off => pair.off.as_path(),
            })
    }

    /// Device names with complete sound pairs, as spelled on disk
    pub fn devices(&self) -> impl Iterator<Item = &str> {
        self.sounds.values().map(|pair| pair.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
