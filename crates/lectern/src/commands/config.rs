use anyhow::Result;
use colored::Colorize;

use lectern::config::Config;
use lectern::theme::Theme;
use lectern::transition::{EffectLibrary, TransitionTiming};

use crate::cli::ConfigCommands;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let timing = config.transition_timing();
    let defaults = TransitionTiming::default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    print_value(
        "defaults.theme",
        config.theme().as_deref(),
        Theme::NAMES[0],
    );
    print_value(
        "defaults.transition",
        config.transition().as_deref(),
        EffectLibrary::standard().names()[0],
    );
    print_value(
        "defaults.transition_ms",
        Some(timing.duration.as_millis().to_string()).as_deref(),
        &defaults.duration.as_millis().to_string(),
    );
    print_value(
        "defaults.transition_steps",
        Some(timing.steps.to_string()).as_deref(),
        &defaults.steps.to_string(),
    );
    print_value(
        "defaults.start_slide",
        config.start_slide().map(|n| n.to_string()).as_deref(),
        "1",
    );
    Ok(())
}

fn print_value(key: &str, value: Option<&str>, default: &str) {
    match value {
        Some(value) if value != default => println!("  {key} = {}", value.green()),
        _ => println!("  {key} = {} {}", default, "(default)".dimmed()),
    }
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!("{} {key} = {value}", "Set".green().bold());
    println!("{}", format!("Saved to {}", path.display()).dimmed());
    Ok(())
}
