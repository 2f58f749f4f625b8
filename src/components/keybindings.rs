//! Keybinding system for context-aware keyboard shortcuts
//!
//! Bindings depend on what has focus: the task list, the error dialog or the
//! help overlay. The same registry drives key dispatch, the footer hints and
//! the help overlay, so the three never disagree.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// What currently receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMode {
    TaskList,
    ErrorDialog,
    Help,
}

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    Home,
    End,
    Toggle,
    ToggleAll,
    Apply,
    Dismiss,
    Help,
    Quit,
    ForceQuit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
    /// Listed in the help overlay but not in the footer
    pub hidden_in_nav: bool,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
            hidden_in_nav: false,
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            modifiers,
            ..Self::new(key, action, display, description)
        }
    }

    fn hidden(mut self) -> Self {
        self.hidden_in_nav = true;
        self
    }

    /// Plain bindings ignore Shift (terminals differ on `?`) but not Ctrl/Alt
    fn matches(&self, event: &KeyEvent) -> bool {
        if self.key != event.code {
            return false;
        }
        if self.modifiers.is_empty() {
            !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        } else {
            event.modifiers.contains(self.modifiers)
        }
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Mode-specific keybindings
    mode_bindings: HashMap<KeyMode, Vec<Keybinding>>,
    /// Global keybindings (available in all modes)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            mode_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        self.global_bindings = vec![Keybinding::with_modifiers(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            KeyAction::ForceQuit,
            "Ctrl+C",
            "Force quit (kills a running command)",
        )
        .hidden()];

        self.mode_bindings.insert(
            KeyMode::TaskList,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Move up"),
                Keybinding::new(KeyCode::Char('k'), KeyAction::NavigateUp, "k", "Move up").hidden(),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Move down"),
                Keybinding::new(KeyCode::Char('j'), KeyAction::NavigateDown, "j", "Move down")
                    .hidden(),
                Keybinding::new(KeyCode::Home, KeyAction::Home, "Home", "First optimization")
                    .hidden(),
                Keybinding::new(KeyCode::End, KeyAction::End, "End", "Last optimization").hidden(),
                Keybinding::new(KeyCode::Char(' '), KeyAction::Toggle, "Space", "Toggle"),
                Keybinding::new(KeyCode::Char('a'), KeyAction::ToggleAll, "A", "Toggle all"),
                Keybinding::new(KeyCode::Enter, KeyAction::Apply, "Enter", "Apply selected"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        self.mode_bindings.insert(
            KeyMode::ErrorDialog,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Dismiss, "Enter", "Dismiss"),
                Keybinding::new(KeyCode::Esc, KeyAction::Dismiss, "Esc", "Dismiss"),
            ],
        );

        self.mode_bindings.insert(
            KeyMode::Help,
            vec![
                Keybinding::new(KeyCode::Char('?'), KeyAction::Dismiss, "?", "Close help"),
                Keybinding::new(KeyCode::Esc, KeyAction::Dismiss, "Esc", "Close help"),
            ],
        );
    }

    /// Get keybindings for a specific mode (includes global bindings)
    pub fn get_bindings(&self, mode: KeyMode) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(mode_bindings) = self.mode_bindings.get(&mode) {
            bindings.extend(mode_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());

        bindings
    }

    /// Resolve a key press to an action in the given mode
    pub fn action_for(&self, mode: KeyMode, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(mode)
            .into_iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }

    /// Footer hints, with Up/Down folded into one item
    pub fn get_nav_items(&self, mode: KeyMode) -> Vec<NavBarItem> {
        let mut items: Vec<NavBarItem> = Vec::new();
        let mut has_nav = false;

        for binding in self.get_bindings(mode) {
            if binding.hidden_in_nav {
                continue;
            }
            let is_nav = matches!(binding.action, KeyAction::NavigateUp | KeyAction::NavigateDown);
            if is_nav {
                if !has_nav {
                    items.push(NavBarItem {
                        key_display: "Up/Dn".to_string(),
                        action_label: "Navigate".to_string(),
                    });
                    has_nav = true;
                }
                continue;
            }
            // Esc and Enter both dismiss; show one
            if items.iter().any(|i| i.action_label == binding.description) {
                continue;
            }
            items.push(NavBarItem {
                key_display: binding.display.clone(),
                action_label: binding.description.clone(),
            });
        }

        items
    }

    /// Get full help content for a mode (for help overlay)
    pub fn get_help_content(&self, mode: KeyMode) -> Vec<HelpSection> {
        let section = |title: &str, filter: fn(KeyAction) -> bool| HelpSection {
            title: title.to_string(),
            items: self
                .get_bindings(mode)
                .into_iter()
                .filter(|b| filter(b.action))
                .map(|b| (b.display.clone(), b.description.clone()))
                .collect(),
        };

        [
            section("Navigation", |a| {
                matches!(
                    a,
                    KeyAction::NavigateUp | KeyAction::NavigateDown | KeyAction::Home | KeyAction::End
                )
            }),
            section("Selection", |a| {
                matches!(a, KeyAction::Toggle | KeyAction::ToggleAll | KeyAction::Apply)
            }),
            section("General", |a| {
                matches!(
                    a,
                    KeyAction::Dismiss | KeyAction::Help | KeyAction::Quit | KeyAction::ForceQuit
                )
            }),
        ]
        .into_iter()
        .filter(|s| !s.items.is_empty())
        .collect()
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_task_list_actions() {
        let ctx = KeybindingContext::new();
        let mode = KeyMode::TaskList;
        assert_eq!(ctx.action_for(mode, &key(KeyCode::Char('j'))), Some(KeyAction::NavigateDown));
        assert_eq!(ctx.action_for(mode, &key(KeyCode::Up)), Some(KeyAction::NavigateUp));
        assert_eq!(ctx.action_for(mode, &key(KeyCode::Char(' '))), Some(KeyAction::Toggle));
        assert_eq!(ctx.action_for(mode, &key(KeyCode::Enter)), Some(KeyAction::Apply));
        assert_eq!(ctx.action_for(mode, &key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_is_force_quit_everywhere() {
        let ctx = KeybindingContext::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [KeyMode::TaskList, KeyMode::ErrorDialog, KeyMode::Help] {
            assert_eq!(ctx.action_for(mode, &ctrl_c), Some(KeyAction::ForceQuit));
        }
        // Plain 'c' is not bound
        assert_eq!(ctx.action_for(KeyMode::TaskList, &key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_shifted_question_mark_opens_help() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(ctx.action_for(KeyMode::TaskList, &event), Some(KeyAction::Help));
    }

    #[test]
    fn test_ctrl_does_not_trigger_plain_binding() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(ctx.action_for(KeyMode::TaskList, &event), None);
    }

    #[test]
    fn test_error_dialog_only_dismisses() {
        let ctx = KeybindingContext::new();
        assert_eq!(ctx.action_for(KeyMode::ErrorDialog, &key(KeyCode::Esc)), Some(KeyAction::Dismiss));
        assert_eq!(ctx.action_for(KeyMode::ErrorDialog, &key(KeyCode::Char(' '))), None);
    }

    #[test]
    fn test_nav_items_fold_arrows() {
        let ctx = KeybindingContext::new();
        let items = ctx.get_nav_items(KeyMode::TaskList);
        assert_eq!(items[0].key_display, "Up/Dn");
        assert_eq!(items.iter().filter(|i| i.action_label == "Navigate").count(), 1);
        assert!(!items.iter().any(|i| i.key_display == "Ctrl+C"));

        let dialog = ctx.get_nav_items(KeyMode::ErrorDialog);
        assert_eq!(dialog.len(), 1);
    }

    #[test]
    fn test_help_content_lists_hidden_bindings() {
        let ctx = KeybindingContext::new();
        let sections = ctx.get_help_content(KeyMode::TaskList);
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Navigation", "Selection", "General"]);
        assert!(sections[0].items.iter().any(|(k, _)| k == "j"));
        assert!(sections[2].items.iter().any(|(k, _)| k == "Ctrl+C"));
    }
}
