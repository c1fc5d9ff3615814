use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use eframe::egui;

use lectern::config::Config;
use lectern::demo;
use lectern::raster::{Rasterize, SlideRasterizer};
use lectern::style::StyleTable;
use lectern::theme::Theme;

pub fn run(
    output_dir: PathBuf,
    width: u32,
    height: u32,
    theme: Option<String>,
) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let theme_name = theme
        .or_else(|| config.theme())
        .unwrap_or_else(|| Theme::NAMES[0].to_string());
    if !Theme::is_known(&theme_name) {
        anyhow::bail!("Invalid theme: {theme_name}. Must be 'light' or 'dark'.");
    }
    let styles = StyleTable::from_theme(&Theme::from_name(&theme_name));

    let presentation = demo::presentation();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    eprintln!(
        "Exporting {} slides to {} ({}x{}, {} theme)",
        presentation.len(),
        output_dir.display(),
        width,
        height,
        theme_name,
    );

    let rasterizer = SlideRasterizer::new();
    let viewport = egui::vec2(width as f32, height as f32);
    for (index, slide) in presentation.slides().iter().enumerate() {
        let raster = rasterizer
            .rasterize(slide, &styles, viewport)
            .with_context(|| format!("Failed to render slide {}", index + 1))?;
        let filename = format!("slide-{:02}.png", index + 1);
        raster
            .save_png(&output_dir.join(&filename))
            .with_context(|| format!("Failed to save {filename}"))?;
        eprintln!("  Saved {filename}");
    }

    eprintln!("{}", "Export complete.".green().bold());
    Ok(())
}
