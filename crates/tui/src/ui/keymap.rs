use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{app::view::View, ui::components::hints::KeyHint};

/// Keys handled by the orchestrator before the focused view sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    ToggleHelp,
    PreviousPeriod,
    NextPeriod,
    RefreshAll,
    NextTab,
    PreviousTab,
    Focus(View),
}

/// Maps a key to a global action. Inside the form only `Ctrl+C` is global.
pub fn map_global(key: KeyEvent, form_open: bool) -> Option<GlobalAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(GlobalAction::Quit),
            _ => None,
        };
    }
    if form_open {
        return None;
    }

    match key.code {
        KeyCode::Char('q') => Some(GlobalAction::Quit),
        KeyCode::Char('?') => Some(GlobalAction::ToggleHelp),
        KeyCode::Char('[') => Some(GlobalAction::PreviousPeriod),
        KeyCode::Char(']') => Some(GlobalAction::NextPeriod),
        KeyCode::Char('R') => Some(GlobalAction::RefreshAll),
        KeyCode::Tab => Some(GlobalAction::NextTab),
        KeyCode::BackTab => Some(GlobalAction::PreviousTab),
        KeyCode::Char(ch @ '1'..='6') => {
            let index = ch as usize - '1' as usize;
            View::TABS.get(index).copied().map(GlobalAction::Focus)
        }
        _ => None,
    }
}

const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint::new(key, action)
}

const GLOBAL_HINTS: &[KeyHint] = &[
    hint("1-6", "tabs"),
    hint("[ ]", "period"),
    hint("R", "reload"),
    hint("?", "help"),
    hint("q", "quit"),
];

const LIST_HINTS: &[KeyHint] = &[
    hint("j/k", "move"),
    hint("s", "sort"),
    hint("f", "filter"),
    hint("enter", "select"),
    hint("n", "new"),
    hint("r", "refresh"),
    hint("esc", "back"),
];

const TRANSACTION_HINTS: &[KeyHint] = &[
    hint("j/k", "move"),
    hint("/", "search"),
    hint("esc", "reset"),
    hint("w", "full width"),
    hint("n", "new"),
    hint("r", "refresh"),
];

const FORM_HINTS: &[KeyHint] = &[
    hint("tab", "next field"),
    hint("←/→", "type"),
    hint("enter", "save"),
    hint("esc", "back"),
    hint("ctrl+c", "quit"),
];

pub const PROMPT_HINTS: &[KeyHint] = &[hint("enter", "confirm"), hint("esc", "cancel")];

/// Legend lines for `view`; the second line only exists with help shown.
pub fn hints(view: View) -> (&'static [KeyHint], &'static [KeyHint]) {
    match view {
        View::Transactions => (TRANSACTION_HINTS, GLOBAL_HINTS),
        View::NewTransactionForm => (FORM_HINTS, &[]),
        _ => (LIST_HINTS, GLOBAL_HINTS),
    }
}
