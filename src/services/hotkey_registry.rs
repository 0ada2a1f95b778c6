use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{ActionType, HotkeyBinding, KeyCombination, RegistrationState};
use crate::services::key_hook::KeyHook;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

/// Владелец карты "комбинация -> действие" и состояний регистрации.
/// Все обращения к механизму горячих клавиш идут через него и под его
/// блокировкой - одна и та же комбинация никогда не регистрируется
/// дважды одновременно.
pub struct HotkeyRegistry {
    hook: Arc<dyn KeyHook>,
    state: Mutex<RegistryState>,
    // Взведён на время recover: подавляет параллельное восстановление
    // и очередной цикл health-проверки
    recovery_in_flight: AtomicBool,
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<KeyCombination, BindingEntry>,
    last_bindings: Vec<HotkeyBinding>,
}

#[derive(Debug)]
struct BindingEntry {
    action: ActionType,
    registration: RegistrationState,
}

impl HotkeyRegistry {
    pub fn new(hook: Arc<dyn KeyHook>) -> Self {
        Self {
            hook,
            state: Mutex::new(RegistryState::default()),
            recovery_in_flight: AtomicBool::new(false),
        }
    }

    /// Полная пересборка набора привязок: снять всё зарегистрированное,
    /// установить новый набор. Дубликат комбинации - побеждает последняя
    /// запись, предыдущая не регистрируется вовсе.
    pub fn rebuild(&self, bindings: Vec<HotkeyBinding>) -> Result<()> {
        let mut state = self.state.lock();

        for (combination, entry) in state.entries.iter() {
            if entry.registration == RegistrationState::Registered {
                if let Err(e) = self.hook.unregister(combination) {
                    warn!("Не удалось снять комбинацию {}: {}", combination, e);
                }
            }
        }
        state.entries.clear();

        // Схлопываем дубликаты до регистрации
        let mut deduped: HashMap<KeyCombination, ActionType> = HashMap::new();
        for binding in &bindings {
            deduped.insert(binding.combination.clone(), binding.action);
        }

        let total = deduped.len();
        let mut registered = 0;
        for (combination, action) in deduped {
            let registration = match self.hook.register(&combination) {
                Ok(()) => {
                    registered += 1;
                    RegistrationState::Registered
                }
                Err(e) => {
                    warn!("Регистрация {} не удалась: {}", combination, e);
                    RegistrationState::Failed
                }
            };
            state.entries.insert(combination, BindingEntry { action, registration });
        }

        state.last_bindings = bindings;
        info!("Набор привязок пересобран: {}/{} зарегистрировано", registered, total);
        Ok(())
    }

    /// Один цикл самовосстановления: повторить регистрацию всех привязок
    /// не в состоянии Registered. Возвращает число восстановленных.
    pub fn health_cycle(&self) -> usize {
        let mut state = self.state.lock();
        let mut recovered = 0;

        for (combination, entry) in state.entries.iter_mut() {
            if entry.registration == RegistrationState::Registered {
                continue;
            }
            match self.hook.register(combination) {
                Ok(()) => {
                    info!("Комбинация {} восстановлена", combination);
                    entry.registration = RegistrationState::Registered;
                    recovered += 1;
                }
                Err(e) => {
                    debug_if_enabled!("Комбинация {} всё ещё недоступна: {}", combination, e);
                }
            }
        }

        recovered
    }

    /// Периодический цикл самовосстановления
    pub async fn run_health_loop(self: Arc<Self>, check_interval: Duration) {
        info!("Цикл самовосстановления запущен (интервал {:?})", check_interval);
        let mut ticker = interval(check_interval);

        loop {
            ticker.tick().await;

            if self.recovery_in_flight.load(Ordering::Acquire) {
                debug_if_enabled!("Идёт ручное восстановление - пропускаем цикл");
                continue;
            }

            self.health_cycle();
        }
    }

    /// Ручное восстановление: полная пересборка по последнему известному
    /// набору привязок. Нужна, когда механизм горячих клавиш умер целиком
    /// и все комбинации перестали срабатывать разом. Возвращает false,
    /// если восстановление уже выполняется.
    pub fn recover(&self) -> bool {
        if self.recovery_in_flight.swap(true, Ordering::AcqRel) {
            warn!("Восстановление уже выполняется - повторный запуск подавлен");
            return false;
        }

        info!("Ручное восстановление привязок");
        let last_bindings = self.state.lock().last_bindings.clone();
        if let Err(e) = self.rebuild(last_bindings) {
            warn!("Восстановление завершилось ошибкой: {}", e);
        }

        self.recovery_in_flight.store(false, Ordering::Release);
        true
    }

    /// Счётчики для индикации: (зарегистрировано, всего)
    pub fn status(&self) -> (usize, usize) {
        let state = self.state.lock();
        let registered = state
            .entries
            .values()
            .filter(|e| e.registration == RegistrationState::Registered)
            .count();
        (registered, state.entries.len())
    }

    /// Найти действие для сработавшей комбинации
    pub fn resolve(&self, combination: &KeyCombination) -> Option<ActionType> {
        self.state.lock().entries.get(combination).map(|e| e.action)
    }

    /// Снять все регистрации при завершении работы
    pub fn stop(&self) {
        let mut state = self.state.lock();
        for (combination, entry) in state.entries.iter_mut() {
            if entry.registration == RegistrationState::Registered {
                if let Err(e) = self.hook.unregister(combination) {
                    warn!("Не удалось снять комбинацию {}: {}", combination, e);
                }
                entry.registration = RegistrationState::Unregistered;
            }
        }
        info!("Все привязки сняты");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyCombination;
    use crate::services::key_hook::DryRunHook;

    fn combo(s: &str) -> KeyCombination {
        KeyCombination::parse(s).unwrap()
    }

    fn bindings() -> Vec<HotkeyBinding> {
        vec![
            HotkeyBinding::new(combo("ctrl+alt+8"), ActionType::ResizePercent(80)),
            HotkeyBinding::new(combo("ctrl+alt+c"), ActionType::Center),
        ]
    }

    #[test]
    fn test_rebuild_registers_all_bindings() {
        let hook = Arc::new(DryRunHook::new());
        let registry = HotkeyRegistry::new(hook.clone());

        registry.rebuild(bindings()).unwrap();

        assert_eq!(registry.status(), (2, 2));
        assert!(hook.is_registered(&combo("ctrl+alt+8")));
        assert!(hook.is_registered(&combo("ctrl+alt+c")));
    }

    #[test]
    fn test_rebuild_duplicate_combination_keeps_last() {
        let hook = Arc::new(DryRunHook::new());
        let registry = HotkeyRegistry::new(hook.clone());

        registry
            .rebuild(vec![
                HotkeyBinding::new(combo("ctrl+alt+8"), ActionType::ResizePercent(80)),
                HotkeyBinding::new(combo("ctrl+alt+8"), ActionType::Fullscreen),
            ])
            .unwrap();

        assert_eq!(registry.status(), (1, 1));
        assert_eq!(hook.registered_count(), 1);
        assert_eq!(registry.resolve(&combo("ctrl+alt+8")), Some(ActionType::Fullscreen));
    }

    #[test]
    fn test_rebuild_replaces_previous_set() {
        let hook = Arc::new(DryRunHook::new());
        let registry = HotkeyRegistry::new(hook.clone());

        registry.rebuild(bindings()).unwrap();
        registry
            .rebuild(vec![HotkeyBinding::new(combo("ctrl+alt+f"), ActionType::Fullscreen)])
            .unwrap();

        assert_eq!(registry.status(), (1, 1));
        assert!(!hook.is_registered(&combo("ctrl+alt+8")));
        assert!(hook.is_registered(&combo("ctrl+alt+f")));
    }

    #[test]
    fn test_failed_registration_is_surfaced_in_status() {
        let hook = Arc::new(DryRunHook::new());
        hook.fail_registration(&combo("ctrl+alt+c"), true);
        let registry = HotkeyRegistry::new(hook.clone());

        registry.rebuild(bindings()).unwrap();

        assert_eq!(registry.status(), (1, 2));
        // Действие разрешается и для незарегистрированной привязки
        assert_eq!(registry.resolve(&combo("ctrl+alt+c")), Some(ActionType::Center));
    }

    #[test]
    fn test_health_cycle_recovers_failed_binding() {
        let hook = Arc::new(DryRunHook::new());
        hook.fail_registration(&combo("ctrl+alt+c"), true);
        let registry = HotkeyRegistry::new(hook.clone());
        registry.rebuild(bindings()).unwrap();
        assert_eq!(registry.status(), (1, 2));

        // Пока конфликт держится - цикл ничего не меняет
        assert_eq!(registry.health_cycle(), 0);
        assert_eq!(registry.status(), (1, 2));

        // Конфликт исчез - следующий цикл восстанавливает ровно одну привязку
        hook.fail_registration(&combo("ctrl+alt+c"), false);
        assert_eq!(registry.health_cycle(), 1);
        assert_eq!(registry.status(), (2, 2));
    }

    #[test]
    fn test_recover_rebuilds_last_known_set() {
        let hook = Arc::new(DryRunHook::new());
        let registry = HotkeyRegistry::new(hook.clone());
        registry.rebuild(bindings()).unwrap();

        // Эмуляция смерти механизма: все регистрации пропали на стороне ОС
        hook.unregister(&combo("ctrl+alt+8")).unwrap();
        hook.unregister(&combo("ctrl+alt+c")).unwrap();

        assert!(registry.recover());
        assert_eq!(registry.status(), (2, 2));
        assert!(hook.is_registered(&combo("ctrl+alt+8")));
        assert!(hook.is_registered(&combo("ctrl+alt+c")));
    }

    #[test]
    fn test_resolve_unknown_combination() {
        let hook = Arc::new(DryRunHook::new());
        let registry = HotkeyRegistry::new(hook);
        registry.rebuild(bindings()).unwrap();

        assert_eq!(registry.resolve(&combo("ctrl+alt+z")), None);
    }

    #[test]
    fn test_stop_unregisters_everything() {
        let hook = Arc::new(DryRunHook::new());
        let registry = HotkeyRegistry::new(hook.clone());
        registry.rebuild(bindings()).unwrap();

        registry.stop();

        assert_eq!(registry.status(), (0, 2));
        assert_eq!(hook.registered_count(), 0);
    }
}
