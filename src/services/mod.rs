pub mod action_executor;
pub mod dispatcher;
pub mod hotkey_registry;
pub mod key_hook;
pub mod sequence_detector;
pub mod window_gateway;

pub use action_executor::ActionExecutor;
pub use dispatcher::Dispatcher;
pub use hotkey_registry::HotkeyRegistry;
pub use key_hook::create_key_hook;
pub use sequence_detector::SequenceDetector;
pub use window_gateway::create_window_gateway;
