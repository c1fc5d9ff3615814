use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::theme::Theme;
use crate::transition::{DEFAULT_DURATION, DEFAULT_STEPS, EffectLibrary, TransitionTiming};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "lectern";

const VALID_KEYS: &str = "defaults.theme, defaults.transition, defaults.transition_ms, \
defaults.transition_steps, defaults.start_slide";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Transition effect name, e.g. "Fade" or "Slide Left".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_ms: Option<u64>,

    /// Zero disables the animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_steps: Option<u32>,

    /// One-based slide to open on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `lectern config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# Lectern configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.theme" => {
                if !Theme::is_known(value) {
                    anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'.");
                }
                defaults.theme = Some(value.to_string());
            }
            "defaults.transition" => {
                let effects = EffectLibrary::standard();
                let index = effects.position(value)?;
                let name = effects.names()[index];
                defaults.transition = Some(name.to_string());
            }
            "defaults.transition_ms" => match value.parse::<u64>() {
                Ok(ms) if ms > 0 => defaults.transition_ms = Some(ms),
                _ => anyhow::bail!(
                    "Invalid transition_ms: {value}. Must be a positive number of milliseconds."
                ),
            },
            "defaults.transition_steps" => match value.parse::<u32>() {
                Ok(steps) => defaults.transition_steps = Some(steps),
                Err(_) => anyhow::bail!(
                    "Invalid transition_steps: {value}. Must be a whole number (0 disables animation)."
                ),
            },
            "defaults.start_slide" => match value.parse::<usize>() {
                Ok(slide) if slide > 0 => defaults.start_slide = Some(slide),
                _ => anyhow::bail!("Invalid start_slide: {value}. Must be a slide number from 1."),
            },
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }

    fn defaults(&self) -> DefaultsConfig {
        self.defaults.clone().unwrap_or_default()
    }

    pub fn theme(&self) -> Option<String> {
        self.defaults().theme
    }

    pub fn transition(&self) -> Option<String> {
        self.defaults().transition
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults().start_slide
    }

    pub fn transition_timing(&self) -> TransitionTiming {
        let defaults = self.defaults();
        TransitionTiming::new(
            defaults
                .transition_ms
                .map_or(DEFAULT_DURATION, Duration::from_millis),
            defaults.transition_steps.unwrap_or(DEFAULT_STEPS),
        )
    }
}
