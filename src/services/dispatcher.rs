use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::KeyCombination;
use crate::services::action_executor::ActionExecutor;
use crate::services::hotkey_registry::HotkeyRegistry;
use crate::services::key_hook::KeyHook;
use crate::services::sequence_detector::SequenceDetector;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

/// Единая точка входа для сработавших комбинаций: ступени жеста уходят
/// в детектор последовательности, остальные действия - напрямую
/// в исполнитель. Непривязанные комбинации игнорируются.
pub struct Dispatcher {
    registry: Arc<HotkeyRegistry>,
    executor: Arc<ActionExecutor>,
    detector: SequenceDetector,
    hook: Arc<dyn KeyHook>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<HotkeyRegistry>,
        executor: Arc<ActionExecutor>,
        detector: SequenceDetector,
        hook: Arc<dyn KeyHook>,
    ) -> Self {
        Self { registry, executor, detector, hook }
    }

    /// Обработать одно срабатывание комбинации
    pub fn dispatch(&self, combination: &KeyCombination) {
        let Some(action) = self.registry.resolve(combination) else {
            debug_if_enabled!("Непривязанная комбинация {} - игнорируем", combination);
            return;
        };

        debug_if_enabled!("Сработала комбинация {} -> {}", combination, action);

        if action.is_sequence_stage() {
            self.detector.handle(action);
        } else {
            // Посторонняя комбинация во взведённом состоянии снимает жест,
            // своё действие выполняет ровно один раз
            self.detector.cancel();
            self.executor.execute(action);
        }
    }

    /// Цикл обработки: вычитывает сработавшие комбинации из механизма
    /// горячих клавиш. Частота опроса с запасом выше темпа живого ввода.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        info!("Диспетчер запущен");
        let mut poll = interval(Duration::from_millis(10));

        loop {
            poll.tick().await;
            while let Some(combination) = self.hook.try_recv() {
                self.dispatch(&combination);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ActionType, HotkeyBinding};
    use crate::geometry::Rect;
    use crate::services::key_hook::DryRunHook;
    use crate::services::window_gateway::DryRunGateway;
    use tokio::time::sleep;

    struct Fixture {
        gateway: Arc<DryRunGateway>,
        hook: Arc<DryRunHook>,
        dispatcher: Arc<Dispatcher>,
    }

    fn combo(s: &str) -> KeyCombination {
        KeyCombination::parse(s).unwrap()
    }

    fn fixture() -> Fixture {
        let gateway = Arc::new(DryRunGateway::new());
        let hook = Arc::new(DryRunHook::new());

        let registry = Arc::new(HotkeyRegistry::new(hook.clone()));
        registry
            .rebuild(vec![
                HotkeyBinding::new(combo("ctrl+alt+c"), ActionType::Center),
                HotkeyBinding::new(combo("ctrl+alt+f"), ActionType::Fullscreen),
                HotkeyBinding::new(combo("ctrl+shift+h"), ActionType::MinimizeAllArm),
                HotkeyBinding::new(combo("ctrl+shift+m"), ActionType::MinimizeAllConfirm),
            ])
            .unwrap();

        let executor = Arc::new(ActionExecutor::new(gateway.clone(), 25));
        let detector = SequenceDetector::new(executor.clone(), Duration::from_millis(2000));
        let dispatcher = Arc::new(Dispatcher::new(registry, executor, detector, hook.clone()));

        Fixture { gateway, hook, dispatcher }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_direct_action() {
        let f = fixture();
        f.gateway.set_work_area(Rect::new(0, 0, 1920, 1040));

        f.dispatcher.dispatch(&combo("ctrl+alt+f"));

        assert_eq!(f.gateway.applied_rects(), vec![Rect::new(0, 0, 1920, 1040)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbound_combination_is_ignored() {
        let f = fixture();

        f.dispatcher.dispatch(&combo("ctrl+alt+z"));

        assert!(f.gateway.applied_rects().is_empty());
        assert_eq!(f.gateway.minimize_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_minimize_sequence() {
        let f = fixture();

        f.dispatcher.dispatch(&combo("ctrl+shift+h"));
        sleep(Duration::from_millis(500)).await;
        f.dispatcher.dispatch(&combo("ctrl+shift+m"));

        assert_eq!(f.gateway.minimize_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrelated_hotkey_cancels_armed_sequence() {
        let f = fixture();

        f.dispatcher.dispatch(&combo("ctrl+shift+h"));
        // Посторонняя комбинация: своё действие выполняется один раз,
        // взведение снимается
        f.dispatcher.dispatch(&combo("ctrl+alt+c"));
        assert_eq!(f.gateway.applied_rects().len(), 1);

        f.dispatcher.dispatch(&combo("ctrl+shift+m"));
        assert_eq!(f.gateway.minimize_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_without_arm_is_noop() {
        let f = fixture();

        f.dispatcher.dispatch(&combo("ctrl+shift+m"));

        assert_eq!(f.gateway.minimize_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_drains_hook_events() {
        let f = fixture();
        f.gateway.set_work_area(Rect::new(0, 0, 1920, 1040));

        let handle = tokio::spawn(f.dispatcher.clone().run());

        f.hook.press(&combo("ctrl+alt+f"));
        sleep(Duration::from_millis(50)).await;

        assert_eq!(f.gateway.applied_rects(), vec![Rect::new(0, 0, 1920, 1040)]);
        handle.abort();
    }
}
