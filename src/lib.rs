use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use design_tokens_core::{
    config::Config,
    icons::Icons,
    themes::{write_colors, ColorArtifacts},
    typography::Typography,
    DesignTokens,
};
use slug::slugify;
use tracing::info;

pub mod fonts;

/// Where generated artifacts land on disk.
#[derive(Debug, Clone)]
pub struct Output {
    base: PathBuf,
    fonts: PathBuf,
    colors: PathBuf,
    icons: PathBuf,
}

impl Output {
    pub fn new(config: &Config) -> Self {
        let base = config.output_dir.clone();
        let dir = |configured: &Option<PathBuf>, fallback: &[&str]| match configured {
            Some(dir) => base.join(dir),
            None => fallback.iter().fold(base.clone(), |path, part| path.join(part)),
        };
        Self {
            fonts: dir(&config.typography_dir, &["css", "fonts"]),
            colors: dir(&config.colors_dir, &["css", "colors"]),
            icons: dir(&config.icons_dir, &["icons"]),
            base,
        }
    }

    /// Removes the folders a previous run wrote.
    pub fn reset(&self) -> anyhow::Result<()> {
        for dir in [&self.fonts, &self.colors, &self.icons] {
            match fs::remove_dir_all(dir) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => {
                    return Err(err).with_context(|| format!("removing {}", dir.display()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Writes everything `tokens` holds.
    pub fn write(&self, tokens: &DesignTokens, config: &Config) -> anyhow::Result<()> {
        self.reset()?;
        if let Some(typography) = &tokens.typography {
            self.save_typography(typography)?;
        }
        if let Some(colors) = &tokens.colors {
            self.save_colors(&write_colors(colors, config))?;
        }
        if let Some(icons) = &tokens.icons {
            self.save_icons(icons)?;
        }
        Ok(())
    }

    pub fn save_colors(&self, artifacts: &ColorArtifacts) -> anyhow::Result<()> {
        for stylesheet in &artifacts.stylesheets {
            write_file(
                &self.colors.join(format!("{}.css", stylesheet.theme)),
                &stylesheet.content,
            )?;
        }
        write_file(
            &self.base.join("tailwind.colors.js"),
            &artifacts.utility_module()?,
        )?;
        info!("colors: {} utilities", artifacts.utility_colors.len());
        Ok(())
    }

    pub fn save_typography(&self, typography: &[Typography]) -> anyhow::Result<()> {
        write_file(&self.fonts.join("common.css"), &fonts::fonts_css(typography))?;
        write_file(
            &self.base.join("tailwind.fonts.js"),
            &fonts::tailwind_fonts(typography)?,
        )?;
        info!("typography: {} styles", typography.len());
        Ok(())
    }

    pub fn save_icons(&self, icons: &Icons) -> anyhow::Result<()> {
        for (name, svg) in icons {
            write_file(&self.icons.join(format!("{}.svg", slugify(name))), svg)?;
        }
        info!("icons: {} files", icons.len());
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
