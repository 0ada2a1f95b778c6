use crate::error::Result;
use crate::events::KeyCombination;
use std::sync::Arc;

/// Trait for key hooks that can run in different modes.
///
/// Единственная граница ядра с механизмом глобальных горячих клавиш ОС:
/// регистрация и снятие комбинаций плюс неблокирующее получение сработавших.
/// Реестр обращается к ОС только через этот trait.
pub trait KeyHook: Send + Sync {
    /// Зарегистрировать комбинацию; RegistrationConflict если она
    /// уже занята другим процессом
    fn register(&self, combination: &KeyCombination) -> Result<()>;

    /// Снять регистрацию комбинации
    fn unregister(&self, combination: &KeyCombination) -> Result<()>;

    /// Забрать очередную сработавшую комбинацию, если есть
    fn try_recv(&self) -> Option<KeyCombination>;
}

/// Factory function to create an appropriate key hook based on the dry_run flag
pub fn create_key_hook(dry_run: bool) -> Result<Arc<dyn KeyHook>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunHook::new()))
    } else {
        Ok(Arc::new(super::global::GlobalHotKeyHook::new()?))
    }
}
