pub mod action;
pub mod keyboard;

pub use action::{ActionType, HotkeyBinding, RegistrationState};
pub use keyboard::{KeyCombination, Modifiers};
