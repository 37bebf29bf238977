//! Screen trait — the building block for every tab view.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use vulpini_core::StateStore;

use crate::action::Action;
use crate::theme::Theme;

/// Every tab view implements Screen.
///
/// Screens own only view-local state (row selection, scroll offsets,
/// open forms); all monitor data comes in by reference from the single
/// [`StateStore`] at call time, so a screen can never hold a stale copy.
pub trait Screen {
    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key(&mut self, key: KeyEvent, store: &StateStore) -> Option<Action>;

    /// Render into the provided frame area.
    fn render(&mut self, frame: &mut Frame, area: Rect, store: &StateStore, theme: &Theme);

    /// Whether this screen is currently capturing text input. While
    /// true, single-letter global keybindings are suspended.
    fn wants_input(&self) -> bool {
        false
    }
}
