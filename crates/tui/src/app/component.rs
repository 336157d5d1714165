use crate::app::command::{Cmd, Msg};

/// A sub-view driven by the orchestrator.
pub trait Component {
    fn update(&mut self, msg: &Msg) -> Cmd;
    fn focus(&mut self);
    fn blur(&mut self);
    fn is_focused(&self) -> bool;
}
