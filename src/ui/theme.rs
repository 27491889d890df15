use ratatui::style::Color;

/// Palette shared by every screen and popup.
pub struct Theme;

impl Theme {
    /// Header badge background.
    pub fn brand() -> Color {
        Color::Green
    }

    pub fn border() -> Color {
        Color::Cyan
    }

    /// Income, falling spend and successful saves.
    pub fn positive() -> Color {
        Color::LightGreen
    }

    pub fn warn() -> Color {
        Color::Yellow
    }

    /// Failures, debits and rising spend.
    pub fn negative() -> Color {
        Color::LightRed
    }

    /// Active tab, focused field.
    pub fn focus() -> Color {
        Color::Cyan
    }

    pub fn marker() -> Color {
        Color::Green
    }

    pub fn muted() -> Color {
        Color::DarkGray
    }

    pub fn text() -> Color {
        Color::White
    }

    pub fn amount() -> Color {
        Color::LightBlue
    }
}
