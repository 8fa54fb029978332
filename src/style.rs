use ratatui::style::{Color, Modifier, Style as RatStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::mode::Mode;

/// Color that can be serialized/deserialized
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// Named color: "red", "blue", "cyan", etc.
    Named(NamedColor),
    /// RGB color: [255, 128, 0]
    Rgb([u8; 3]),
    /// 256-color index: 42
    Indexed(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightCyan,
    White,
    Reset,
}

impl From<NamedColor> for Color {
    fn from(n: NamedColor) -> Color {
        match n {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::Gray => Color::Gray,
            NamedColor::DarkGray => Color::DarkGray,
            NamedColor::LightRed => Color::LightRed,
            NamedColor::LightGreen => Color::LightGreen,
            NamedColor::LightYellow => Color::LightYellow,
            NamedColor::LightBlue => Color::LightBlue,
            NamedColor::LightCyan => Color::LightCyan,
            NamedColor::White => Color::White,
            NamedColor::Reset => Color::Reset,
        }
    }
}

impl From<ThemeColor> for Color {
    fn from(tc: ThemeColor) -> Color {
        match tc {
            ThemeColor::Named(n) => n.into(),
            ThemeColor::Rgb([r, g, b]) => Color::Rgb(r, g, b),
            ThemeColor::Indexed(i) => Color::Indexed(i),
        }
    }
}

/// Style definition for a single element
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<ThemeColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<ThemeColor>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub dim: bool,
}

impl ElementStyle {
    pub fn fg(color: ThemeColor) -> Self {
        Self { fg: Some(color), ..Default::default() }
    }

    pub fn with_bg(mut self, color: ThemeColor) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn to_ratatui(&self) -> RatStyle {
        let mut style = RatStyle::default();
        if let Some(fg) = self.fg {
            style = style.fg(fg.into());
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg.into());
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}

/// Complete theme configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    #[serde(default)]
    pub background: Option<ThemeColor>,

    // Accumulator panel
    pub value: ElementStyle,
    pub operand: ElementStyle,
    pub border: ElementStyle,

    // History list
    pub history_applied: ElementStyle,
    pub history_undone: ElementStyle,
    pub history_cursor: ElementStyle,

    // Status bar
    pub status_bar: ElementStyle,
    pub status_mode_normal: ElementStyle,
    pub status_mode_command: ElementStyle,

    // Messages
    pub message_info: ElementStyle,
    pub message_error: ElementStyle,

    // Command line
    pub command_line: ElementStyle,
    pub command_prompt: ElementStyle,
}

impl Theme {
    pub fn dark() -> Self {
        use NamedColor::*;
        Self {
            name: "dark".to_string(),
            background: Some(ThemeColor::Named(Black)),
            value: ElementStyle::fg(ThemeColor::Named(LightGreen)).with_bold(),
            operand: ElementStyle::fg(ThemeColor::Named(LightYellow)),
            border: ElementStyle::fg(ThemeColor::Named(Gray)),
            history_applied: ElementStyle::fg(ThemeColor::Named(White)),
            history_undone: ElementStyle::fg(ThemeColor::Named(DarkGray)).with_dim(),
            history_cursor: ElementStyle::fg(ThemeColor::Named(LightCyan)).with_bold(),
            status_bar: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(DarkGray)),
            status_mode_normal: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightBlue))
                .with_bold(),
            status_mode_command: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightYellow))
                .with_bold(),
            message_info: ElementStyle::fg(ThemeColor::Named(White)),
            message_error: ElementStyle::fg(ThemeColor::Named(LightRed)).with_bold(),
            command_line: ElementStyle::fg(ThemeColor::Named(White)),
            command_prompt: ElementStyle::fg(ThemeColor::Named(LightCyan)),
        }
    }

    pub fn light() -> Self {
        use NamedColor::*;
        Self {
            name: "light".to_string(),
            background: None,
            value: ElementStyle::fg(ThemeColor::Named(Blue)).with_bold(),
            operand: ElementStyle::fg(ThemeColor::Named(Magenta)),
            border: ElementStyle::fg(ThemeColor::Named(DarkGray)),
            history_applied: ElementStyle::fg(ThemeColor::Named(Black)),
            history_undone: ElementStyle::fg(ThemeColor::Named(Gray)).with_dim(),
            history_cursor: ElementStyle::fg(ThemeColor::Named(Blue)).with_bold(),
            status_bar: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(Gray)),
            status_mode_normal: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(Blue))
                .with_bold(),
            status_mode_command: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(Yellow))
                .with_bold(),
            message_info: ElementStyle::fg(ThemeColor::Named(Black)),
            message_error: ElementStyle::fg(ThemeColor::Named(Red)).with_bold(),
            command_line: ElementStyle::fg(ThemeColor::Named(Black)),
            command_prompt: ElementStyle::fg(ThemeColor::Named(Blue)),
        }
    }

    /// Load theme from TOML file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read theme file: {}", e))?;
        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse theme file: {}", e))
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// List available built-in themes
    pub fn builtin_names() -> &'static [&'static str] {
        &["dark", "light"]
    }
}

/// Runtime style manager
pub struct Style {
    pub theme: Theme,
}

impl Style {
    pub fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn value(&self) -> RatStyle {
        self.theme.value.to_ratatui()
    }

    pub fn operand(&self) -> RatStyle {
        self.theme.operand.to_ratatui()
    }

    pub fn border(&self) -> RatStyle {
        self.theme.border.to_ratatui()
    }

    pub fn history_applied(&self) -> RatStyle {
        self.theme.history_applied.to_ratatui()
    }

    pub fn history_undone(&self) -> RatStyle {
        self.theme.history_undone.to_ratatui()
    }

    pub fn history_cursor(&self) -> RatStyle {
        self.theme.history_cursor.to_ratatui()
    }

    pub fn status_bar(&self) -> RatStyle {
        self.theme.status_bar.to_ratatui()
    }

    pub fn status_mode(&self, mode: &Mode) -> RatStyle {
        match mode {
            Mode::Normal => self.theme.status_mode_normal.to_ratatui(),
            Mode::Command => self.theme.status_mode_command.to_ratatui(),
        }
    }

    pub fn message_info(&self) -> RatStyle {
        self.theme.message_info.to_ratatui()
    }

    pub fn message_error(&self) -> RatStyle {
        self.theme.message_error.to_ratatui()
    }

    pub fn command_line(&self) -> RatStyle {
        self.theme.command_line.to_ratatui()
    }

    pub fn command_prompt(&self) -> RatStyle {
        self.theme.command_prompt.to_ratatui()
    }

    pub fn background(&self) -> Option<Color> {
        self.theme.background.map(|c| c.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("DARK").map(|t| t.name), Some("dark".to_string()));
        assert_eq!(Theme::by_name("light").map(|t| t.name), Some("light".to_string()));
        assert!(Theme::by_name("solarized").is_none());
        for name in Theme::builtin_names() {
            assert!(Theme::by_name(name).is_some());
        }
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(Color::from(ThemeColor::Named(NamedColor::LightCyan)), Color::LightCyan);
        assert_eq!(Color::from(ThemeColor::Rgb([1, 2, 3])), Color::Rgb(1, 2, 3));
        assert_eq!(Color::from(ThemeColor::Indexed(42)), Color::Indexed(42));
    }

    #[test]
    fn test_element_style_to_ratatui() {
        let style = ElementStyle::fg(ThemeColor::Named(NamedColor::Red)).with_bold().to_ratatui();
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(!style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_theme_round_trips_through_file() {
        let mut theme = Theme::light();
        theme.name = "custom".to_string();
        theme.value = ElementStyle::fg(ThemeColor::Rgb([255, 128, 0]));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", toml::to_string(&theme).unwrap()).unwrap();

        let loaded = Theme::from_file(file.path()).unwrap();
        assert_eq!(loaded, theme);
    }

    #[test]
    fn test_from_file_reports_errors() {
        let missing = Theme::from_file(Path::new("/nonexistent/theme.toml"));
        assert!(missing.unwrap_err().starts_with("Failed to read theme file"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "name = 3").unwrap();
        let bad = Theme::from_file(file.path());
        assert!(bad.unwrap_err().starts_with("Failed to parse theme file"));
    }
}
