//! Built-in table themes.
//!
//! A theme pairs a set of box-drawing glyphs with the six semantic colors a
//! table uses: border, caption (title), header, footer, summary and body
//! text. Themes are looked up by name, case-insensitively; an unknown name
//! falls back to [`DEFAULT_THEME`] with a warning.
//!
//! ```rust
//! use tables_render::theme;
//!
//! let blue = theme::resolve("blue");
//! assert_eq!(blue.name, "Blue");
//! assert_eq!(blue.border.top_left, '┌');
//!
//! // Unknown names never fail.
//! assert_eq!(theme::resolve("Plaid").name, "Red");
//! ```

use console::Style;
use once_cell::sync::Lazy;

/// Theme used when the layout names none, or names one that does not exist.
pub const DEFAULT_THEME: &str = "Red";

/// Box-drawing characters for a theme.
///
/// `*_t` glyphs are T-junctions named after the side the stem points away
/// from: `top_t` is `┬` (stem down), `bottom_t` is `┴` (stem up), `left_t`
/// is `├`, `right_t` is `┤`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderChars {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub left_t: char,
    pub cross: char,
    pub right_t: char,
    pub top_t: char,
    pub bottom_t: char,
}

impl BorderChars {
    /// Light box-drawing with rounded corners: ╭ ─ ╮ │ ╰ ╯ ├ ┼ ┤ ┬ ┴
    pub const ROUNDED: BorderChars = BorderChars {
        horizontal: '─',
        vertical: '│',
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        left_t: '├',
        cross: '┼',
        right_t: '┤',
        top_t: '┬',
        bottom_t: '┴',
    };

    /// Light box-drawing with square corners: ┌ ─ ┐ │ └ ┘ ├ ┼ ┤ ┬ ┴
    pub const LIGHT: BorderChars = BorderChars {
        horizontal: '─',
        vertical: '│',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        left_t: '├',
        cross: '┼',
        right_t: '┤',
        top_t: '┬',
        bottom_t: '┴',
    };
}

/// Semantic colors of a table.
#[derive(Clone, Debug)]
pub struct Palette {
    pub border: Style,
    pub caption: Style,
    pub header: Style,
    pub footer: Style,
    pub summary: Style,
    pub text: Style,
}

impl Palette {
    /// Returns a copy whose styles emit escape codes even when stdout is not
    /// a terminal.
    pub fn forced(&self) -> Palette {
        Palette {
            border: self.border.clone().force_styling(true),
            caption: self.caption.clone().force_styling(true),
            header: self.header.clone().force_styling(true),
            footer: self.footer.clone().force_styling(true),
            summary: self.summary.clone().force_styling(true),
            text: self.text.clone().force_styling(true),
        }
    }
}

/// A named theme.
#[derive(Clone, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub border: BorderChars,
    pub palette: Palette,
}

static THEMES: Lazy<Vec<Theme>> = Lazy::new(|| {
    vec![
        Theme {
            name: "Red",
            border: BorderChars::ROUNDED,
            palette: Palette {
                border: Style::new().red(),
                caption: Style::new().white().bold(),
                header: Style::new().yellow().bold(),
                footer: Style::new().white().italic(),
                summary: Style::new().green().bold(),
                text: Style::new().white(),
            },
        },
        Theme {
            name: "Blue",
            border: BorderChars::LIGHT,
            palette: Palette {
                border: Style::new().blue(),
                caption: Style::new().cyan().bold(),
                header: Style::new().cyan(),
                footer: Style::new().cyan().italic(),
                summary: Style::new().magenta().bold(),
                text: Style::new().white(),
            },
        },
    ]
});

/// Names of all built-in themes.
pub fn names() -> Vec<&'static str> {
    THEMES.iter().map(|t| t.name).collect()
}

/// Finds a theme by name, ignoring case.
pub fn lookup(name: &str) -> Option<&'static Theme> {
    let name = name.trim();
    THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Finds a theme by name, falling back to [`DEFAULT_THEME`] with a warning.
pub fn resolve(name: &str) -> &'static Theme {
    if let Some(theme) = lookup(name) {
        return theme;
    }
    tracing::warn!(
        theme = name,
        fallback = DEFAULT_THEME,
        available = ?names(),
        "unknown theme"
    );
    default_theme()
}

fn default_theme() -> &'static Theme {
    // THEMES is a non-empty literal and DEFAULT_THEME names its first entry.
    &THEMES[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes() {
        assert_eq!(names(), vec!["Red", "Blue"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("RED").map(|t| t.name), Some("Red"));
        assert_eq!(lookup(" blue ").map(|t| t.name), Some("Blue"));
        assert!(lookup("green").is_none());
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(resolve("Solarized").name, DEFAULT_THEME);
        assert_eq!(default_theme().name, DEFAULT_THEME);
    }

    #[test]
    fn red_is_rounded_blue_is_square() {
        assert_eq!(resolve("Red").border.top_left, '╭');
        assert_eq!(resolve("Blue").border.bottom_right, '┘');
    }

    #[test]
    fn forced_palette_emits_escapes() {
        let palette = resolve("Red").palette.forced();
        let painted = palette.border.apply_to("─").to_string();
        assert!(painted.contains('\u{1b}'));
        assert_eq!(console::strip_ansi_codes(&painted), "─");
    }
}
