use super::r#trait::KeyHook;
use crate::error::{HotwinError, Result};
use crate::events::KeyCombination;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use tracing::info;

/// Механизм-эмуляция: регистрации учитываются в памяти, нажатия
/// подкладываются тестами. Поддерживает инъекцию отказов регистрации
/// для проверки цикла самовосстановления.
pub struct DryRunHook {
    state: Mutex<HookState>,
}

#[derive(Debug, Default)]
struct HookState {
    registered: HashSet<KeyCombination>,
    failing: HashSet<KeyCombination>,
    queue: VecDeque<KeyCombination>,
}

impl DryRunHook {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HookState::default()),
        }
    }

    /// Пометить комбинацию как "занятую другим процессом"
    #[allow(dead_code)]
    pub fn fail_registration(&self, combination: &KeyCombination, fail: bool) {
        let mut state = self.state.lock();
        if fail {
            state.failing.insert(combination.clone());
        } else {
            state.failing.remove(combination);
        }
    }

    /// Эмулировать нажатие комбинации
    #[allow(dead_code)]
    pub fn press(&self, combination: &KeyCombination) {
        self.state.lock().queue.push_back(combination.clone());
    }

    #[allow(dead_code)]
    pub fn is_registered(&self, combination: &KeyCombination) -> bool {
        self.state.lock().registered.contains(combination)
    }

    #[allow(dead_code)]
    pub fn registered_count(&self) -> usize {
        self.state.lock().registered.len()
    }
}

impl Default for DryRunHook {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyHook for DryRunHook {
    fn register(&self, combination: &KeyCombination) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing.contains(combination) {
            return Err(HotwinError::RegistrationConflict(format!(
                "{}: комбинация занята", combination
            )));
        }

        info!("[DRY RUN] Комбинация {} зарегистрирована", combination);
        state.registered.insert(combination.clone());
        Ok(())
    }

    fn unregister(&self, combination: &KeyCombination) -> Result<()> {
        self.state.lock().registered.remove(combination);
        Ok(())
    }

    fn try_recv(&self) -> Option<KeyCombination> {
        self.state.lock().queue.pop_front()
    }
}
