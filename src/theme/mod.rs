//! Terminal styles for human-mode output.

use console::Style;

/// Styles shared by every human-mode message.
pub struct WssTheme {
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub color_id: Style,
    pub fingerprint: Style,
}

impl Default for WssTheme {
    fn default() -> Self {
        Self {
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().dim(),
            header: Style::new().color256(62).bold(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            color_id: Style::new().cyan(),
            fingerprint: Style::new().italic().dim(),
        }
    }
}

impl WssTheme {
    /// A swatch block in the given color, for truecolor terminals.
    pub fn swatch(rgb: [u8; 3]) -> String {
        let [r, g, b] = rgb;
        if console::colors_enabled() {
            format!("\x1b[48;2;{r};{g};{b}m    \x1b[0m")
        } else {
            "    ".to_string()
        }
    }
}
