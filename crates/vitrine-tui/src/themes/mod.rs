//! Theme registry and loader

mod dracula;
mod gruvbox;
mod nord;

use ratatui::style::Color;
use tracing::warn;
use vitrine_core::config::{ThemeColorOverrides, ThemeConfig};

use crate::theme::Theme;

pub use gruvbox::dark as gruvbox_dark;

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Load a theme by name from config
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "gruvbox-light" => gruvbox::light(),
        "gruvbox" | "gruvbox-dark" => gruvbox::dark(),
        "dracula" => dracula::default(),
        "nord" => nord::default(),
        other => {
            warn!(theme = other, "Unknown theme, falling back to gruvbox-dark");
            gruvbox::dark()
        }
    };

    apply_overrides(base, &config.colors)
}

/// Apply user color overrides to a base theme
fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    let slots: [(&Option<String>, &mut Color); 8] = [
        (&overrides.bg0, &mut theme.bg0),
        (&overrides.bg1, &mut theme.bg1),
        (&overrides.fg0, &mut theme.fg0),
        (&overrides.fg1, &mut theme.fg1),
        (&overrides.accent, &mut theme.accent),
        (&overrides.muted, &mut theme.muted),
        (&overrides.error, &mut theme.error),
        (&overrides.success, &mut theme.success),
    ];

    for (hex, slot) in slots {
        let Some(hex) = hex else { continue };
        match parse_hex_color(hex) {
            Some(color) => *slot = color,
            None => warn!(value = %hex, "Ignoring invalid color override"),
        }
    }

    theme
}

/// Get list of available theme names
pub fn available_themes() -> Vec<&'static str> {
    vec!["gruvbox-dark", "gruvbox-light", "dracula", "nord"]
}
