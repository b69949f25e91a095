use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use s2c_core::ics::{IcsOptions, generate_ics};
use s2c_core::source::ScheduleInput;

use crate::render::{Render, pluralize};

use super::{CompileArgs, Prepared, prepare};

pub fn run(args: &CompileArgs, output: Option<PathBuf>) -> Result<()> {
    let Prepared {
        config,
        input,
        schedule,
    } = prepare(args)?;

    println!("{}", schedule.activity.render().bold());
    for event in &schedule.events {
        println!("   {}", event.render());
    }

    let path = output.unwrap_or_else(|| {
        let dir = config
            .output_dir()
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(input.default_file_name())
    });

    let ics = generate_ics(
        &schedule,
        &IcsOptions {
            calendar_name: Some(calendar_name(&input)),
            dtstamp: Utc::now(),
        },
    )?;
    write_ics(&path, &ics)?;

    let count = schedule.events.len();
    println!(
        "\n{} Wrote {} {} to {}",
        "✓".green(),
        count,
        pluralize("event", count),
        path.display()
    );

    Ok(())
}

fn calendar_name(input: &ScheduleInput) -> String {
    match (&input.school_year, &input.semester) {
        (Some(year), Some(semester)) => format!("{year} term {semester}"),
        _ => "Timetable".to_string(),
    }
}

fn write_ics(path: &Path, ics: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    std::fs::write(path, ics).with_context(|| format!("Could not write {}", path.display()))
}
