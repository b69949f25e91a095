use anyhow::Result;
use owo_colors::OwoColorize;
use s2c_core::config::S2cConfig;

pub fn run() -> Result<()> {
    let config_path = S2cConfig::config_path()?;
    let created = !config_path.exists();
    let config = S2cConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    match config.output_dir() {
        Some(dir) => println!("  Output:  {}", dir.display()),
        None => println!("  Output:  {}", "current directory".dimmed()),
    }

    if created {
        println!("\n{}", "Created a default config file.".dimmed());
    }

    Ok(())
}
