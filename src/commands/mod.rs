pub mod compile;
pub mod config;
pub mod preview;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use s2c_core::CompileOptions;
use s2c_core::compiler::{CompiledSchedule, ScheduleCompiler};
use s2c_core::config::S2cConfig;
use s2c_core::source::{JsonFileSource, ScheduleInput, ScheduleSource};

/// Input and per-run overrides shared by `compile` and `preview`.
#[derive(Args, Debug, Clone, Default)]
pub struct CompileArgs {
    /// Schedule JSON exported by the scraper
    pub input: PathBuf,

    /// Minutes before class the reminder fires (0-120)
    #[arg(long)]
    pub alarm: Option<u32>,

    /// Use the D/E/F building times for periods 3-4
    #[arg(long)]
    pub building_override: bool,

    /// Split classes that run across the lunch or dinner break
    #[arg(long)]
    pub split: bool,

    /// IANA time zone of the timetable (e.g. "Asia/Shanghai")
    #[arg(long)]
    pub timezone: Option<String>,
}

impl CompileArgs {
    /// Layer command-line flags over the configured options.
    pub fn apply(&self, options: &mut CompileOptions) {
        if let Some(alarm) = self.alarm {
            options.alarm_lead_minutes = alarm;
        }
        if self.building_override {
            options.apply_building_time_override = true;
        }
        if self.split {
            options.split_cross_break_blocks = true;
        }
        if let Some(ref timezone) = self.timezone {
            options.timezone = timezone.clone();
        }
    }
}

/// Everything a command needs after a successful compile.
pub struct Prepared {
    pub config: S2cConfig,
    pub input: ScheduleInput,
    pub schedule: CompiledSchedule,
}

/// Load config, read the input file and compile it.
pub fn prepare(args: &CompileArgs) -> Result<Prepared> {
    let config = S2cConfig::load().context("Failed to load config")?;
    prepare_with(config, args)
}

fn prepare_with(config: S2cConfig, args: &CompileArgs) -> Result<Prepared> {
    let source = JsonFileSource::new(&args.input);
    let input = source
        .fetch()
        .with_context(|| format!("Failed to read schedule from {}", source.path().display()))?;

    let mut options = config.compile.clone();
    args.apply(&mut options);

    let compiler = ScheduleCompiler::new(options, config.timetable()?);
    let schedule = compiler
        .compile(&input.term, &input.records)
        .context("Failed to compile schedule")?;

    Ok(Prepared {
        config,
        input,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = r#"{
        "studentId": "031519101",
        "schoolYear": "2019-2020",
        "semester": "2",
        "term": { "startYear": 2019, "allOccupyWeek": 1, "allStartWeek": 1, "allEndWeek": 18 },
        "records": [{
            "teacherId": "T01",
            "teacherName": "Li Wei",
            "courseId": "MATH101",
            "courseName": "Calculus",
            "roomId": "R101",
            "roomName": "A101",
            "weekMask": "11111111111111111100000000000000000000000000000000000",
            "dayOfWeek": 0,
            "periods": [0, 1]
        }]
    }"#;

    fn write_schedule(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("schedule.json");
        std::fs::write(&path, SCHEDULE).unwrap();
        path
    }

    #[test]
    fn flags_override_config_values() {
        let mut options = CompileOptions::default();
        let args = CompileArgs {
            alarm: Some(30),
            split: true,
            timezone: Some("Asia/Tokyo".into()),
            ..Default::default()
        };

        args.apply(&mut options);

        assert_eq!(options.alarm_lead_minutes, 30);
        assert!(options.split_cross_break_blocks);
        assert!(!options.apply_building_time_override);
        assert_eq!(options.timezone, "Asia/Tokyo");
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut options = CompileOptions {
            alarm_lead_minutes: 45,
            apply_building_time_override: true,
            ..Default::default()
        };

        CompileArgs::default().apply(&mut options);

        assert_eq!(options.alarm_lead_minutes, 45);
        assert!(options.apply_building_time_override);
    }

    #[test]
    fn prepares_schedule_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            input: write_schedule(&dir),
            ..Default::default()
        };

        let prepared = prepare_with(S2cConfig::default(), &args).unwrap();

        assert_eq!(prepared.schedule.events.len(), 1);
        assert_eq!(prepared.input.default_file_name(), "031519101_2019-2020_term2.ics");
        assert_eq!(prepared.schedule.events[0].summary, "Calculus Li Wei");
    }

    #[test]
    fn out_of_range_alarm_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            input: write_schedule(&dir),
            alarm: Some(121),
            ..Default::default()
        };

        let err = prepare_with(S2cConfig::default(), &args).err().unwrap();
        assert!(format!("{err:#}").contains("Failed to compile schedule"), "{err:#}");
    }
}
