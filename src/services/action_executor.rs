use crate::config::{MAX_INCREMENT_PX, MIN_INCREMENT_PX};
use crate::debug_if_enabled;
use crate::error::HotwinError;
use crate::events::ActionType;
use crate::geometry::{self, Rect, StepDirection};
use crate::services::window_gateway::WindowGateway;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Единственное место, где действия превращаются в геометрию и мутации окон.
/// Любой сбой деградирует до "нажатие ничего не сделало" плюс запись в лог -
/// наружу ошибки не уходят.
pub struct ActionExecutor {
    gateway: Arc<dyn WindowGateway>,
    // Шаг Expand/Shrink читается атомарно при каждом срабатывании,
    // чтобы смена настройки действовала со следующего нажатия
    increment_px: AtomicU32,
}

impl ActionExecutor {
    pub fn new(gateway: Arc<dyn WindowGateway>, increment_px: u32) -> Self {
        Self {
            gateway,
            increment_px: AtomicU32::new(increment_px.clamp(MIN_INCREMENT_PX, MAX_INCREMENT_PX)),
        }
    }

    /// Обновить шаг изменения размера; значение прижимается к [5, 150]
    pub fn set_increment(&self, increment_px: u32) {
        let clamped = increment_px.clamp(MIN_INCREMENT_PX, MAX_INCREMENT_PX);
        if clamped != increment_px {
            warn!(
                "Шаг {} вне диапазона [{}, {}] - использую {}",
                increment_px, MIN_INCREMENT_PX, MAX_INCREMENT_PX, clamped
            );
        }
        self.increment_px.store(clamped, Ordering::Relaxed);
    }

    pub fn increment(&self) -> u32 {
        self.increment_px.load(Ordering::Relaxed)
    }

    /// Выполнить действие. Ровно одна мутация окна на успешное срабатывание;
    /// повторов при сбое set_rect нет - запоздавший ввод не должен
    /// сработать дважды.
    pub fn execute(&self, action: ActionType) {
        match action {
            ActionType::MinimizeAllArm => {
                // Ступень жеста, окнами занимается детектор последовательности
                debug_if_enabled!("MinimizeAllArm не мутирует окна напрямую");
            }
            ActionType::MinimizeAllConfirm => match self.gateway.minimize_all() {
                Ok(count) => info!("Свёрнуто {} окон", count),
                Err(e) => warn!("Не удалось свернуть окна: {}", e),
            },
            direct => self.execute_direct(direct),
        }
    }

    fn execute_direct(&self, action: ActionType) {
        let handle = match self.gateway.focused_window() {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                // Ожидаемое состояние, а не ошибка
                debug_if_enabled!("Нет окна в фокусе - действие {} пропущено", action);
                return;
            }
            Err(e) => {
                warn!("Не удалось определить окно в фокусе: {}", e);
                return;
            }
        };

        let rect = match self.gateway.window_rect(handle) {
            Ok(rect) => rect,
            Err(e) => {
                warn!("Не удалось получить прямоугольник окна {}: {}", handle, e);
                return;
            }
        };
        let work_area = match self.gateway.work_area(handle) {
            Ok(work_area) => work_area,
            Err(e) => {
                warn!("Не удалось получить рабочую область для {}: {}", handle, e);
                return;
            }
        };

        let Some(target) = self.target_rect(action, rect, work_area) else {
            return;
        };

        debug_if_enabled!("{}: {} -> {} (окно {})", action, rect, target, handle);
        match self.gateway.set_rect(handle, target) {
            Ok(()) => {}
            Err(HotwinError::StaleHandle(msg)) => {
                // Окно исчезло между get и set: разовый промах, без повтора
                warn!("Устаревший дескриптор: {}", msg);
            }
            Err(e) => {
                warn!("Не удалось применить {} к окну {}: {}", target, handle, e);
            }
        }
    }

    fn target_rect(&self, action: ActionType, rect: Rect, work_area: Rect) -> Option<Rect> {
        match action {
            ActionType::ResizePercent(percent) => Some(geometry::resize_to(rect, work_area, percent)),
            ActionType::Center => Some(geometry::center(rect, work_area)),
            ActionType::Fullscreen => Some(geometry::fullscreen(work_area)),
            ActionType::Expand => Some(geometry::step(rect, work_area, self.increment(), StepDirection::Expand)),
            ActionType::Shrink => Some(geometry::step(rect, work_area, self.increment(), StepDirection::Shrink)),
            ActionType::MinimizeAllArm | ActionType::MinimizeAllConfirm => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::window_gateway::DryRunGateway;

    fn executor_with_gateway() -> (Arc<DryRunGateway>, ActionExecutor) {
        let gateway = Arc::new(DryRunGateway::new());
        let executor = ActionExecutor::new(gateway.clone(), 25);
        (gateway, executor)
    }

    #[test]
    fn test_resize_percent_applies_target_rect() {
        let (gateway, executor) = executor_with_gateway();
        gateway.set_window_rect(Rect::new(100, 100, 800, 600));
        gateway.set_work_area(Rect::new(0, 0, 1920, 1080));

        executor.execute(ActionType::ResizePercent(60));

        assert_eq!(gateway.applied_rects(), vec![Rect::new(100, 100, 1152, 648)]);
    }

    #[test]
    fn test_fullscreen_ignores_current_rect() {
        let (gateway, executor) = executor_with_gateway();
        gateway.set_window_rect(Rect::new(333, 77, 512, 384));
        gateway.set_work_area(Rect::new(0, 0, 1920, 1040));

        executor.execute(ActionType::Fullscreen);

        assert_eq!(gateway.applied_rects(), vec![Rect::new(0, 0, 1920, 1040)]);
    }

    #[test]
    fn test_no_focused_window_is_silent_noop() {
        let (gateway, executor) = executor_with_gateway();
        gateway.set_focused(None);

        executor.execute(ActionType::Center);

        assert!(gateway.applied_rects().is_empty());
    }

    #[test]
    fn test_stale_handle_is_swallowed_without_retry() {
        let (gateway, executor) = executor_with_gateway();
        gateway.fail_set_rect(true);

        executor.execute(ActionType::Center);

        assert!(gateway.applied_rects().is_empty());
    }

    #[test]
    fn test_expand_reads_increment_at_execution_time() {
        let (gateway, executor) = executor_with_gateway();
        gateway.set_window_rect(Rect::new(400, 300, 600, 400));
        gateway.set_work_area(Rect::new(0, 0, 1920, 1080));

        executor.set_increment(30);
        executor.execute(ActionType::Expand);

        assert_eq!(gateway.applied_rects(), vec![Rect::new(370, 270, 660, 460)]);
    }

    #[test]
    fn test_set_increment_clamps_to_bounds() {
        let (_, executor) = executor_with_gateway();

        executor.set_increment(500);
        assert_eq!(executor.increment(), 150);

        executor.set_increment(1);
        assert_eq!(executor.increment(), 5);
    }

    #[test]
    fn test_minimize_confirm_calls_gateway() {
        let (gateway, executor) = executor_with_gateway();

        executor.execute(ActionType::MinimizeAllConfirm);

        assert_eq!(gateway.minimize_calls(), 1);
        assert!(gateway.applied_rects().is_empty());
    }

    #[test]
    fn test_minimize_arm_has_no_direct_effect() {
        let (gateway, executor) = executor_with_gateway();

        executor.execute(ActionType::MinimizeAllArm);

        assert!(gateway.applied_rects().is_empty());
        assert_eq!(gateway.minimize_calls(), 0);
    }
}
