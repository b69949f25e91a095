use anyhow::Result;
use owo_colors::OwoColorize;
use s2c_core::recurrence;

use crate::render::{Render, pluralize};

use super::{CompileArgs, prepare};

pub fn run(args: &CompileArgs, json: bool) -> Result<()> {
    let schedule = prepare(args)?.schedule;

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule.events)?);
        return Ok(());
    }

    println!("{}", schedule.activity.render().bold());

    let mut total = 0;
    for event in &schedule.events {
        let dates = recurrence::expand(event)?;
        total += dates.len();

        println!();
        println!("{}", event.render());
        for date in &dates {
            println!("   {}", date.format("%Y-%m-%d %a %H:%M").dimmed());
        }
    }

    println!(
        "\n{} {}, {} {}",
        schedule.events.len(),
        pluralize("event", schedule.events.len()),
        total,
        pluralize("class", total)
    );

    Ok(())
}
