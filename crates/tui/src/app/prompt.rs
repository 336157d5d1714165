use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    command::{Cmd, Deferred, Msg},
    entities::{self, CreateKind},
    transactions::TransactionFilter,
    view::View,
};

/// Value handed to a continuation when the prompt was dismissed or left empty.
pub const CANCELLED: &str = "None";

/// What to do with the text the user typed.
///
/// Continuations are plain values so callers can build and compare them
/// without running anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Create { kind: CreateKind, origin: View },
    Search { origin: View },
}

impl PromptAction {
    pub fn resolve(&self, input: &str) -> Cmd {
        match self {
            Self::Create { kind, origin } => {
                let back = Cmd::msg(Msg::SetFocusedView(*origin));
                if input == CANCELLED {
                    return back;
                }
                match entities::parse_create(*kind, input) {
                    Ok(request) => Cmd::sequence([back, Cmd::Deferred(Deferred::Create(request))]),
                    Err(err) => Cmd::sequence([Cmd::warn(err.to_string()), back]),
                }
            }
            Self::Search { origin } => {
                let back = Cmd::msg(Msg::SetFocusedView(*origin));
                if input == CANCELLED {
                    return back;
                }
                Cmd::sequence([
                    Cmd::msg(Msg::FilterTransactions(TransactionFilter::Query(
                        input.to_string(),
                    ))),
                    back,
                ])
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub label: String,
    pub initial: String,
    pub action: PromptAction,
}

impl PromptRequest {
    pub fn create(kind: CreateKind, origin: View) -> Self {
        Self {
            label: format!("New {} ({})", kind.noun(), kind.fields().join(", ")),
            initial: String::new(),
            action: PromptAction::Create { kind, origin },
        }
    }

    pub fn search(current: &str, origin: View) -> Self {
        Self {
            label: "Search".to_string(),
            initial: current.to_string(),
            action: PromptAction::Search { origin },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum PromptState {
    #[default]
    Idle,
    Active {
        request: PromptRequest,
        input: String,
    },
}

/// Modal single-line input; while active it receives every key.
#[derive(Debug, Clone, Default)]
pub struct Prompt {
    state: PromptState,
}

impl Prompt {
    pub fn is_active(&self) -> bool {
        matches!(self.state, PromptState::Active { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match &self.state {
            PromptState::Active { request, .. } => Some(request.label.as_str()),
            PromptState::Idle => None,
        }
    }

    pub fn input(&self) -> Option<&str> {
        match &self.state {
            PromptState::Active { input, .. } => Some(input.as_str()),
            PromptState::Idle => None,
        }
    }

    /// Opens the prompt, replacing any pending one.
    pub fn open(&mut self, request: PromptRequest) {
        if self.is_active() {
            tracing::debug!("replacing pending prompt");
        }
        self.state = PromptState::Active {
            input: request.initial.clone(),
            request,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Cmd {
        let PromptState::Active { input, .. } = &mut self.state else {
            return Cmd::None;
        };

        match key.code {
            KeyCode::Enter => {
                let value = input.trim().to_string();
                let value = if value.is_empty() {
                    CANCELLED.to_string()
                } else {
                    value
                };
                self.finish(&value)
            }
            KeyCode::Esc => self.finish(CANCELLED),
            KeyCode::Backspace => {
                input.pop();
                Cmd::None
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.push(ch);
                Cmd::None
            }
            _ => Cmd::None,
        }
    }

    fn finish(&mut self, value: &str) -> Cmd {
        match std::mem::take(&mut self.state) {
            PromptState::Active { request, .. } => request.action.resolve(value),
            PromptState::Idle => Cmd::None,
        }
    }
}
