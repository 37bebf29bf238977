//! Color palettes and semantic styling for the monitor UI.
//!
//! Two fixed palettes (dark and light) behind one [`Theme`] value. The
//! active theme is swapped wholesale when the user toggles modes; every
//! render reads styles through the semantic methods below rather than
//! raw colors, so a palette change repaints the entire UI consistently.

use ratatui::style::{Color, Modifier, Style};
use vulpini_api::{NodeHealth, Severity};

// ── Dark palette (SilkCircuit) ────────────────────────────────────────

const DARK_BG: Color = Color::Rgb(30, 31, 41); // #1e1f29
const DARK_SURFACE: Color = Color::Rgb(40, 42, 54); // #282a36
const DARK_TEXT: Color = Color::Rgb(189, 193, 207); // #bdc1cf
const DARK_MUTED: Color = Color::Rgb(98, 114, 164); // #6272a4
const DARK_ACCENT: Color = Color::Rgb(225, 53, 255); // #e135ff
const DARK_HIGHLIGHT: Color = Color::Rgb(128, 255, 234); // #80ffea
const DARK_INFO: Color = Color::Rgb(139, 233, 253); // #8be9fd
const DARK_SUCCESS: Color = Color::Rgb(80, 250, 123); // #50fa7b
const DARK_WARNING: Color = Color::Rgb(241, 250, 140); // #f1fa8c
const DARK_ERROR: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Light palette ─────────────────────────────────────────────────────

const LIGHT_BG: Color = Color::Rgb(245, 245, 250); // #f5f5fa
const LIGHT_SURFACE: Color = Color::Rgb(228, 230, 240); // #e4e6f0
const LIGHT_TEXT: Color = Color::Rgb(40, 42, 54); // #282a36
const LIGHT_MUTED: Color = Color::Rgb(110, 118, 150); // #6e7696
const LIGHT_ACCENT: Color = Color::Rgb(160, 32, 200); // #a020c8
const LIGHT_HIGHLIGHT: Color = Color::Rgb(0, 130, 140); // #00828c
const LIGHT_INFO: Color = Color::Rgb(30, 110, 200); // #1e6ec8
const LIGHT_SUCCESS: Color = Color::Rgb(20, 140, 60); // #148c3c
const LIGHT_WARNING: Color = Color::Rgb(180, 120, 0); // #b47800
const LIGHT_ERROR: Color = Color::Rgb(200, 40, 40); // #c82828

/// The active color palette, swapped as one value on theme toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: DARK_BG,
            surface: DARK_SURFACE,
            text: DARK_TEXT,
            muted: DARK_MUTED,
            accent: DARK_ACCENT,
            highlight: DARK_HIGHLIGHT,
            info: DARK_INFO,
            success: DARK_SUCCESS,
            warning: DARK_WARNING,
            error: DARK_ERROR,
        }
    }

    pub fn light() -> Self {
        Self {
            background: LIGHT_BG,
            surface: LIGHT_SURFACE,
            text: LIGHT_TEXT,
            muted: LIGHT_MUTED,
            accent: LIGHT_ACCENT,
            highlight: LIGHT_HIGHLIGHT,
            info: LIGHT_INFO,
            success: LIGHT_SUCCESS,
            warning: LIGHT_WARNING,
            error: LIGHT_ERROR,
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }

    // ── Semantic styles ───────────────────────────────────────────────

    /// Title text for blocks/panels.
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Border for an unfocused panel.
    pub fn border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Border for the focused panel.
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Table header row.
    pub fn table_header(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Normal table row text.
    pub fn table_row(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Selected / highlighted table row.
    pub fn table_selected(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.surface)
            .add_modifier(Modifier::BOLD)
    }

    /// Active tab in the tab bar.
    pub fn tab_active(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Inactive tab in the tab bar.
    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Key hint text (e.g., "q quit  ? help").
    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Key hint key character.
    pub fn key_hint_key(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    // ── Domain colors ─────────────────────────────────────────────────

    pub fn severity_color(&self, severity: &Severity) -> Color {
        match severity {
            Severity::High => self.error,
            Severity::Medium => self.warning,
            Severity::Low | Severity::Other(_) => self.info,
        }
    }

    pub fn node_health_color(&self, health: &NodeHealth) -> Color {
        match health {
            NodeHealth::Healthy => self.success,
            NodeHealth::Degraded => self.warning,
            NodeHealth::Unhealthy => self.error,
            NodeHealth::Unknown | NodeHealth::Other(_) => self.muted,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_per_mode() {
        assert_ne!(Theme::dark(), Theme::light());
        assert_eq!(Theme::for_mode(true), Theme::dark());
        assert_eq!(Theme::for_mode(false), Theme::light());
    }

    #[test]
    fn severity_maps_to_escalating_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.severity_color(&Severity::High), theme.error);
        assert_eq!(theme.severity_color(&Severity::Medium), theme.warning);
        assert_eq!(theme.severity_color(&Severity::Low), theme.info);
    }
}
