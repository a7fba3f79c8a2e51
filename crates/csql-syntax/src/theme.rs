//! Highlight themes and their TOML format.
//!
//! The format is a subset of [Helix editor themes](https://docs.helix-editor.com/themes.html):
//! an optional `[palette]` table of named colors, and one entry per capture
//! name, either a bare color string or a table with `fg`, `bg` and
//! `modifiers`. Classification categories are looked up through their
//! capture names (see [`Category::capture_name`]).

use std::collections::HashMap;
use std::path::Path;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use thiserror::Error;

use crate::category::Category;

/// Error loading or parsing a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid color {color:?} for {capture}")]
    InvalidColor { capture: String, color: String },
}

/// Style modifiers (bold, italic, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleModifier {
    Bold,
    Dim,
    Italic,
    Underlined,
    Reversed,
    CrossedOut,
}

impl From<StyleModifier> for Modifier {
    fn from(modifier: StyleModifier) -> Self {
        match modifier {
            StyleModifier::Bold => Modifier::BOLD,
            StyleModifier::Dim => Modifier::DIM,
            StyleModifier::Italic => Modifier::ITALIC,
            StyleModifier::Underlined => Modifier::UNDERLINED,
            StyleModifier::Reversed => Modifier::REVERSED,
            StyleModifier::CrossedOut => Modifier::CROSSED_OUT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    modifiers: Vec<StyleModifier>,
}

/// Either a full style table or a bare foreground color.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StyleValue {
    Full(RawStyle),
    Simple(String),
}

impl StyleValue {
    fn into_raw(self) -> RawStyle {
        match self {
            StyleValue::Full(style) => style,
            StyleValue::Simple(fg) => RawStyle {
                fg: Some(fg),
                ..RawStyle::default()
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    #[serde(default)]
    palette: HashMap<String, String>,
    #[serde(flatten)]
    styles: HashMap<String, StyleValue>,
}

/// A set of styles keyed by capture name.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    styles: HashMap<String, Style>,
}

impl Theme {
    /// Parses a theme from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ThemeError> {
        Self::from_toml_with_name(toml_str, "custom")
    }

    /// Parses a theme from a TOML string with a name.
    ///
    /// Every color must be a palette name, a `#RRGGBB`/`#RGB` hex value or a
    /// terminal color name.
    pub fn from_toml_with_name(toml_str: &str, name: &str) -> Result<Self, ThemeError> {
        let raw: RawTheme = toml::from_str(toml_str)?;

        let mut styles = HashMap::with_capacity(raw.styles.len());
        for (capture, value) in raw.styles {
            if capture == "palette" {
                continue;
            }
            let raw_style = value.into_raw();
            let mut style = Style::default();
            if let Some(fg) = &raw_style.fg {
                style = style.fg(resolve_color(&capture, fg, &raw.palette)?);
            }
            if let Some(bg) = &raw_style.bg {
                style = style.bg(resolve_color(&capture, bg, &raw.palette)?);
            }
            for modifier in raw_style.modifiers {
                style = style.add_modifier(modifier.into());
            }
            styles.insert(capture, style);
        }

        Ok(Self {
            name: name.to_string(),
            styles,
        })
    }

    /// Loads a theme from a TOML file, named after the file stem.
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom");
        Self::from_toml_with_name(&content, name)
    }

    /// Style for a capture name.
    ///
    /// Uses hierarchical fallback: "variable.parameter" falls back to
    /// "variable". Unknown captures get the default style.
    pub fn style_for(&self, capture: &str) -> Style {
        let mut name = capture;
        loop {
            if let Some(style) = self.styles.get(name) {
                return *style;
            }
            match name.rsplit_once('.') {
                Some((parent, _)) => name = parent,
                None => return Style::default(),
            }
        }
    }

    /// Style for a classification category.
    pub fn style_for_category(&self, category: Category) -> Style {
        self.style_for(category.capture_name())
    }

    /// Capture names this theme defines, sorted.
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn resolve_color(
    capture: &str,
    color: &str,
    palette: &HashMap<String, String>,
) -> Result<Color, ThemeError> {
    let resolved = palette.get(color).map_or(color, String::as_str);
    parse_color(resolved).ok_or_else(|| ThemeError::InvalidColor {
        capture: capture.to_string(),
        color: color.to_string(),
    })
}

/// Parses `#RRGGBB`, `#RGB` or a terminal color name.
pub fn parse_color(color: &str) -> Option<Color> {
    let color = color.trim();

    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            6 => Some(Color::Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => Some(Color::Rgb(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            )),
            _ => None,
        };
    }

    match color.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}
