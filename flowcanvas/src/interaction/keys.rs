use crate::Editor;
use serde::{Deserialize, Serialize};

/// Editor action triggered by a keyboard shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyCommand {
    /// Delete every selected node.
    DeleteSelected,
    /// Abort the active drag, or clear the selection when idle.
    Cancel,
    Undo,
    Redo,
    /// Duplicate the selected nodes.
    CopySelected,
    /// Rotate the selected nodes by one step.
    RotateSelected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

impl KeyCommand {
    /// Map a DOM-style key name plus modifiers to a command.
    pub fn from_key(key: &str, mods: Modifiers) -> Option<KeyCommand> {
        let lower = key.to_ascii_lowercase();
        match lower.as_str() {
            "delete" | "backspace" if !mods.command() => Some(KeyCommand::DeleteSelected),
            "escape" | "esc" => Some(KeyCommand::Cancel),
            "z" if mods.command() && mods.shift => Some(KeyCommand::Redo),
            "z" if mods.command() => Some(KeyCommand::Undo),
            "y" if mods.command() => Some(KeyCommand::Redo),
            "d" if mods.command() => Some(KeyCommand::CopySelected),
            "r" if !mods.command() && !mods.alt => Some(KeyCommand::RotateSelected),
            _ => None,
        }
    }
}

impl Editor {
    /// Run a command. Returns whether it had any effect.
    pub fn run_command(&mut self, cmd: KeyCommand) -> bool {
        match cmd {
            KeyCommand::DeleteSelected => self.delete_selected() > 0,
            KeyCommand::Cancel => {
                if self.is_dragging() {
                    self.cancel_gesture()
                } else if self.is_connecting() {
                    self.cancel_connection()
                } else if !self.selection.is_empty() {
                    self.selection.clear();
                    true
                } else {
                    false
                }
            }
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
            KeyCommand::CopySelected => !self.copy_selected().is_empty(),
            KeyCommand::RotateSelected => self.rotate_selected() > 0,
        }
    }

    /// Keyboard entry point. Unmapped keys are ignored.
    pub fn handle_key(&mut self, key: &str, mods: Modifiers) -> bool {
        match KeyCommand::from_key(key, mods) {
            Some(cmd) => self.run_command(cmd),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> Modifiers {
        Modifiers { ctrl: true, ..Default::default() }
    }

    #[test]
    fn key_mapping() {
        let none = Modifiers::default();
        let meta_shift = Modifiers { meta: true, shift: true, ..Default::default() };
        assert_eq!(KeyCommand::from_key("Delete", none), Some(KeyCommand::DeleteSelected));
        assert_eq!(KeyCommand::from_key("Backspace", none), Some(KeyCommand::DeleteSelected));
        assert_eq!(KeyCommand::from_key("Escape", none), Some(KeyCommand::Cancel));
        assert_eq!(KeyCommand::from_key("z", cmd()), Some(KeyCommand::Undo));
        assert_eq!(KeyCommand::from_key("Z", meta_shift), Some(KeyCommand::Redo));
        assert_eq!(KeyCommand::from_key("y", cmd()), Some(KeyCommand::Redo));
        assert_eq!(KeyCommand::from_key("d", cmd()), Some(KeyCommand::CopySelected));
        assert_eq!(KeyCommand::from_key("r", none), Some(KeyCommand::RotateSelected));
        assert_eq!(KeyCommand::from_key("r", cmd()), None);
        assert_eq!(KeyCommand::from_key("z", none), None);
        assert_eq!(KeyCommand::from_key("q", none), None);
    }
}
