//! KeyHook service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for registering key
//! combinations with the OS hotkey mechanism and draining fired events.
//! It MUST NOT decide what a combination means - the binding map, recovery
//! policy and dispatch all live in HotkeyRegistry and Dispatcher.

mod dry_run;
mod global;
mod r#trait;

pub use self::r#trait::{create_key_hook, KeyHook};
pub use dry_run::DryRunHook;
