use convert_case::{Case, Casing};
use design_tokens_core::typography::Typography;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use slug::slugify;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FontMeta {
    line_height: String,
    font_weight: String,
}

fn css_property(key: &str) -> String {
    match key {
        "italic" => "font-style".to_string(),
        "lineHeightPx" => "line-height".to_string(),
        _ => key.to_case(Case::Kebab),
    }
}

fn css_class(typography: &Typography) -> String {
    let entries = [
        ("fontFamily", format!("\"{}\"", typography.font_family)),
        ("fontSize", format!("{}px", typography.font_size)),
        ("fontWeight", typography.font_weight.to_string()),
        ("lineHeightPx", format!("{}px", typography.line_height_px)),
        (
            "italic",
            if typography.italic { "italic" } else { "normal" }.to_string(),
        ),
    ];
    let body = entries
        .iter()
        .map(|(key, value)| format!("  {}: {};", css_property(key), value))
        .join("\n");
    format!(".text-{} {{\n{}\n}}", slugify(&typography.name), body)
}

/// One `.text-*` class per text style.
pub fn fonts_css(typography: &[Typography]) -> String {
    let mut css = typography.iter().map(css_class).join("\n\n");
    css.push('\n');
    css
}

/// Font sizes in the utility framework's `[size, { lineHeight, fontWeight }]` form.
pub fn tailwind_fonts(typography: &[Typography]) -> serde_json::Result<String> {
    let sizes: IndexMap<String, (String, FontMeta)> = typography
        .iter()
        .map(|t| {
            (
                slugify(&t.name),
                (
                    format!("{}px", t.font_size),
                    FontMeta {
                        line_height: format!("{}px", t.line_height_px),
                        font_weight: t.font_weight.to_string(),
                    },
                ),
            )
        })
        .collect();
    Ok(format!("module.exports = {}\n", serde_json::to_string(&sizes)?))
}
