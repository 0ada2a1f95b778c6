use crate::debug_if_enabled;
use crate::events::ActionType;
use crate::services::action_executor::ActionExecutor;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};
use tracing::info;

/// Детектор двухступенчатого жеста "свернуть все окна".
/// Idle -> Armed по первой ступени, подтверждение в пределах таймаута
/// запускает сворачивание, иначе состояние молча возвращается в Idle.
/// Поколение взведения делает запоздавший таймер идемпотентным.
pub struct SequenceDetector {
    inner: Arc<Inner>,
}

struct Inner {
    executor: Arc<ActionExecutor>,
    timeout: Duration,
    state: Mutex<DetectorState>,
}

#[derive(Debug, Default)]
struct DetectorState {
    armed_at: Option<Instant>,
    generation: u64,
}

impl SequenceDetector {
    pub fn new(executor: Arc<ActionExecutor>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                executor,
                timeout,
                state: Mutex::new(DetectorState::default()),
            }),
        }
    }

    /// Обработать ступень жеста
    pub fn handle(&self, action: ActionType) {
        match action {
            ActionType::MinimizeAllArm => self.arm(),
            ActionType::MinimizeAllConfirm => self.confirm(),
            other => {
                debug_if_enabled!("Действие {} не относится к жесту - игнорируем", other);
            }
        }
    }

    /// Взвести жест. Повторное взведение перезапускает отсчёт:
    /// действует только срок последнего взведения.
    pub fn arm(&self) {
        let generation = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            state.armed_at = Some(Instant::now());
            state.generation
        };

        info!("Жест сворачивания взведён");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sleep(inner.timeout).await;
            inner.expire(generation);
        });
    }

    /// Подтвердить жест; сворачивание выполняется ровно один раз
    /// и только в пределах таймаута от взведения
    pub fn confirm(&self) {
        let fire = {
            let mut state = self.inner.state.lock();
            match state.armed_at.take() {
                Some(armed_at) if armed_at.elapsed() <= self.inner.timeout => true,
                Some(_) => {
                    debug_if_enabled!("Подтверждение пришло после таймаута - жест сброшен");
                    false
                }
                None => {
                    debug_if_enabled!("Подтверждение без взведения - игнорируем");
                    false
                }
            }
        };

        if fire {
            info!("Жест сворачивания подтверждён");
            self.inner.executor.execute(ActionType::MinimizeAllConfirm);
        }
    }

    /// Снять взведение без побочных эффектов (посторонняя комбинация)
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        if state.armed_at.take().is_some() {
            debug_if_enabled!("Жест отменён посторонней комбинацией");
        }
    }

    #[allow(dead_code)]
    pub fn is_armed(&self) -> bool {
        self.inner.state.lock().armed_at.is_some()
    }
}

impl Inner {
    /// Срабатывание таймера: сбрасывает только то взведение,
    /// для которого был запущен
    fn expire(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation == generation && state.armed_at.is_some() {
            state.armed_at = None;
            debug_if_enabled!("Жест не подтверждён вовремя - сброшен");
        }
    }
}
