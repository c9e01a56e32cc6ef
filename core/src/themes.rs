//! Turns extracted color records into per-theme stylesheets and the utility color map.

use std::sync::LazyLock;

use csscolorparser::Color;
use indexmap::IndexMap;
use regex::Regex;
use tracing::warn;

use crate::{
    colors::{ColorRecord, Rgb},
    config::Config,
    error::TokenError,
};

pub const DEFAULT_THEME: &str = "default";

const OPACITY_PRECISION: f64 = 1000.0;

peg::parser! {
  grammar color_name() for str {
    rule separator() -> &'input str = [' ' | '/' | '%' | '(' | ')' | '+' | '#' | ',' | '"' | '.']+ { "-" }
    rule word() -> &'input str = $((!separator() [_])+)

    pub(crate) rule identifier() -> String = pieces:(separator() / word())* { pieces.concat() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorName {
    pub theme: String,
    pub id: String,
}

impl ColorName {
    /// Splits `full_name` into theme and identifier.
    ///
    /// With themes the theme is everything before the first `/`; a name without `/` gets an
    /// empty theme, which no bucket matches.
    pub fn parse(full_name: &str, with_theme: bool) -> Result<Self, TokenError> {
        let (theme, candidate) = if with_theme {
            match full_name.split_once('/') {
                Some((theme, rest)) => (theme.trim().to_lowercase(), rest),
                None => (String::new(), full_name),
            }
        } else {
            (DEFAULT_THEME.to_string(), full_name)
        };
        Ok(ColorName {
            theme,
            id: normalize_identifier(candidate)?,
        })
    }
}

/// Lowercases and collapses every run of `[ /%()+#,".]` into a single `-`.
pub fn normalize_identifier(candidate: &str) -> Result<String, TokenError> {
    color_name::identifier(&candidate.trim().to_lowercase())
        .map_err(|err| TokenError::invalid_name(candidate, err.to_string()))
}

static CYRILLIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[а-яА-Я]+").expect("unreachable error: failed to compile cyrillic pattern")
});

fn has_cyrillic(s: &str) -> bool {
    CYRILLIC.is_match(s)
}

/// CSS literal for a color: `rgba(..)` when an opacity is known, uppercase hex otherwise.
pub fn format_color(color: Rgb, opacity: Option<f64>) -> String {
    let color = Color::new(color.r, color.g, color.b, 1.0);
    match opacity {
        Some(opacity) if opacity.is_finite() => {
            let [r, g, b, _] = color.to_rgba8();
            let alpha = (opacity * OPACITY_PRECISION).round() / OPACITY_PRECISION;
            format!("rgba({r}, {g}, {b}, {alpha})")
        }
        _ => color.to_hex_string().to_ascii_uppercase(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeStylesheet {
    pub theme: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorArtifacts {
    /// One per theme, empty unless css output is enabled.
    pub stylesheets: Vec<ThemeStylesheet>,
    pub utility_colors: IndexMap<String, String>,
}

impl ColorArtifacts {
    /// The utility map as a module whose default export is the map.
    pub fn utility_module(&self) -> serde_json::Result<String> {
        Ok(format!(
            "module.exports = {}\n",
            serde_json::to_string(&self.utility_colors)?
        ))
    }
}

struct ThemedColor {
    id: String,
    color: Option<Rgb>,
    opacity: Option<f64>,
}

pub fn write_colors(records: &[ColorRecord], config: &Config) -> ColorArtifacts {
    let multiple_themes = config.multiple_themes();
    let mut themes: IndexMap<String, Vec<ThemedColor>> = if multiple_themes {
        config.themes().iter().map(|theme| (theme.clone(), Vec::new())).collect()
    } else {
        [(DEFAULT_THEME.to_string(), Vec::new())].into_iter().collect()
    };

    for record in records {
        let name = match ColorName::parse(&record.name, multiple_themes) {
            Ok(name) => name,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };
        match themes.get_mut(&name.theme) {
            Some(bucket) => bucket.push(ThemedColor {
                id: name.id,
                color: record.color,
                opacity: record.opacity,
            }),
            None => warn!("Error: incorrect color name '{}'", record.name),
        }
    }

    let mut artifacts = ColorArtifacts::default();
    for (theme, mut colors) in themes {
        colors.retain(|color| {
            if has_cyrillic(&color.id) {
                warn!("incorrect color name: {}", color.id);
                false
            } else if color.id.is_empty() {
                warn!("empty color name in theme '{theme}'");
                false
            } else {
                true
            }
        });
        colors.sort_by(|a, b| a.id.cmp(&b.id));

        let mut lines = String::new();
        for color in colors {
            let Some(rgb) = color.color else {
                warn!("unsupported color: [{theme}] {}", color.id);
                continue;
            };
            let variable = format!("--color-{}", color.id);
            let value = format_color(rgb, color.opacity);
            lines.push_str(&format!("  {variable}: {value};\n"));
            let utility = if config.generate_css {
                format!("var({variable})")
            } else {
                value
            };
            artifacts.utility_colors.insert(color.id, utility);
        }

        if config.generate_css {
            let selector = if multiple_themes {
                config.css_root_selector(&theme).unwrap_or_default()
            } else {
                String::new()
            };
            artifacts.stylesheets.push(ThemeStylesheet {
                content: format!(":root{selector} {{\n{lines}}}\n"),
                theme,
            });
        }
    }

    artifacts
}
