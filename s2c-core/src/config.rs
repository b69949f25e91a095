//! User configuration at ~/.config/s2c/config.toml

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{S2cError, S2cResult};
use crate::options::{CompileOptions, DEFAULT_ALARM_LEAD_MINUTES, DEFAULT_TIMEZONE};
use crate::timetable::{BuildingOverride, ClockTime, PeriodSlot, Timetable};

/// A replacement for the official period table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableConfig {
    pub slots: Vec<PeriodSlot>,
    /// Chronological position of each period. Defaults to index order.
    #[serde(default)]
    pub rank: Option<Vec<u8>>,
    /// Later or earlier times for rooms in particular buildings.
    #[serde(default)]
    pub building_override: Option<BuildingOverrideConfig>,
}

/// `[timetable.building_override]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingOverrideConfig {
    /// Building letters, matched against the first character of the room name.
    pub buildings: Vec<String>,
    pub slots: Vec<OverrideSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSlot {
    pub period: u8,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl BuildingOverrideConfig {
    fn to_override(&self) -> S2cResult<BuildingOverride> {
        let buildings = self
            .buildings
            .iter()
            .map(|name| {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(letter), None) => Ok(letter),
                    _ => Err(S2cError::InvalidConfiguration(format!(
                        "building '{name}' must be a single letter"
                    ))),
                }
            })
            .collect::<S2cResult<Vec<_>>>()?;

        let slots = self
            .slots
            .iter()
            .map(|s| (s.period, PeriodSlot { start: s.start, end: s.end }))
            .collect();

        Ok(BuildingOverride { buildings, slots })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S2cConfig {
    /// Where .ics files are written when no output path is given.
    pub output_dir: Option<PathBuf>,

    pub compile: CompileOptions,

    pub timetable: Option<TimetableConfig>,
}

impl S2cConfig {
    pub fn config_path() -> S2cResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| S2cError::Config("Could not determine config directory".into()))?
            .join("s2c");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, creating a commented-out one on first run.
    pub fn load() -> S2cResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> S2cResult<Self> {
        let config: S2cConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| S2cError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| S2cError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Output directory with `~` expanded.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| {
            PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned())
        })
    }

    /// The configured period table, or the official one.
    pub fn timetable(&self) -> S2cResult<Timetable> {
        let Some(custom) = &self.timetable else {
            return Ok(Timetable::standard());
        };

        let timetable = Timetable::new(custom.slots.clone(), custom.rank.clone())?;
        match &custom.building_override {
            Some(building_override) => timetable.with_building_override(building_override.to_override()?),
            None => Ok(timetable),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> S2cResult<()> {
        let contents = format!(
            "\
# s2c configuration

# Where exported calendars are written:
# output_dir = \"~/Downloads\"

[compile]
# Minutes before class the reminder fires (0-120):
# alarm_lead_minutes = {DEFAULT_ALARM_LEAD_MINUTES}

# Use the later D/E/F building times for periods 3-4:
# apply_building_time_override = false

# Split classes that run across the lunch or dinner break:
# split_cross_break_blocks = false

# Time zone of the timetable:
# timezone = \"{DEFAULT_TIMEZONE}\"

# Replace the official period times:
# [timetable]
# slots = [{{ start = \"08:00\", end = \"08:45\" }}, {{ start = \"08:55\", end = \"09:40\" }}]

# Custom tables have no building times unless given here:
# [timetable.building_override]
# buildings = [\"D\", \"E\", \"F\"]
# slots = [{{ period = 1, start = \"09:15\", end = \"10:00\" }}]
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                S2cError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| S2cError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
