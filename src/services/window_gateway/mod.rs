//! WindowGateway service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to the OS
//! windowing subsystem (focused window, rectangles, work area, minimize).
//! It MUST NOT contain any geometry math or hotkey logic. All target
//! rectangles are computed exclusively by the geometry module, all decisions
//! by ActionExecutor.

mod dry_run;
mod r#trait;
mod xdotool;

pub use self::r#trait::{create_window_gateway, WindowGateway, WindowHandle};
pub use dry_run::DryRunGateway;
