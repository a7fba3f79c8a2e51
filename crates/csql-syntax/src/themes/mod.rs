//! Built-in themes.
//!
//! These are embedded at compile time. Additional themes can be loaded from
//! TOML files at runtime with [`Theme::from_file`].

use crate::theme::Theme;

/// Names accepted by [`by_name`].
pub const BUILT_IN: &[&str] = &["visual_studio", "one_dark"];

/// The classic Visual Studio SQL colors on a dark background.
pub fn visual_studio() -> Theme {
    Theme::from_toml_with_name(VISUAL_STUDIO_TOML, "visual_studio")
        .expect("Built-in theme should be valid")
}

/// One Dark (inspired by Atom's One Dark).
pub fn one_dark() -> Theme {
    Theme::from_toml_with_name(ONE_DARK_TOML, "one_dark").expect("Built-in theme should be valid")
}

/// Looks up a built-in theme. `default` is an alias for `visual_studio`.
pub fn by_name(name: &str) -> Option<Theme> {
    match name {
        "default" | "visual_studio" => Some(visual_studio()),
        "one_dark" => Some(one_dark()),
        _ => None,
    }
}

const VISUAL_STUDIO_TOML: &str = r##"
keyword = "blue"
function = "magenta"
operator = "silver"
string = "red"
number = "mint"
comment = "green"

[palette]
blue = "#569CD6"
magenta = "#C563BD"
silver = "#B4B4B4"
red = "#CB4141"
mint = "#B5CEA8"
firebrick = "#B22222"
green = "#57A64A"

["variable.parameter"]
fg = "firebrick"
modifiers = ["bold"]
"##;

const ONE_DARK_TOML: &str = r##"
[palette]
red = "#E06C75"
green = "#98C379"
yellow = "#E5C07B"
blue = "#61AFEF"
purple = "#C678DD"
cyan = "#56B6C2"
orange = "#D19A66"
gray = "#5C6370"

[keyword]
fg = "purple"

[function]
fg = "blue"

[operator]
fg = "cyan"

[string]
fg = "green"

[number]
fg = "orange"

[variable]
fg = "yellow"

["variable.parameter"]
fg = "red"

[comment]
fg = "gray"
modifiers = ["italic"]
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use ratatui::style::{Color, Modifier};

    #[test]
    fn test_built_in_themes_parse() {
        for name in BUILT_IN {
            let theme = by_name(name).unwrap();
            assert_eq!(theme.name, *name);
        }
        assert_eq!(by_name("default").unwrap().name, "visual_studio");
        assert!(by_name("solarized").is_none());
    }

    #[test]
    fn test_visual_studio_colors() {
        let theme = visual_studio();
        assert_eq!(
            theme.style_for_category(Category::Keyword).fg,
            Some(Color::Rgb(0x56, 0x9C, 0xD6))
        );
        let parameter = theme.style_for_category(Category::Parameter);
        assert_eq!(parameter.fg, Some(Color::Rgb(0xB2, 0x22, 0x22)));
        assert!(parameter.add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.style_for_category(Category::Plain).fg, None);
    }

    #[test]
    fn test_every_category_is_styled() {
        for theme in [visual_studio(), one_dark()] {
            for category in Category::ALL {
                if category != Category::Plain {
                    assert!(
                        theme.style_for_category(category).fg.is_some(),
                        "{} has no style for {category}",
                        theme.name
                    );
                }
            }
        }
    }
}
