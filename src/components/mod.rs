//! Reusable UI components
//!
//! - `floating_window` - Centered overlay box
//! - `help_overlay` - Keybinding help drawn in a floating window
//! - `keybindings` - Mode-aware key registry shared by input and hints

pub mod floating_window;
pub mod help_overlay;
pub mod keybindings;
