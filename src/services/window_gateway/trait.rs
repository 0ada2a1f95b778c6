use crate::error::Result;
use crate::geometry::Rect;
use std::fmt;
use std::sync::Arc;

/// Дескриптор окна оконной подсистемы (X11 window id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Trait for window gateways that can run in different modes.
///
/// Единственная граница ядра с ОС по части окон: получить окно в фокусе,
/// его прямоугольник, рабочую область монитора, применить прямоугольник,
/// свернуть все окна активного рабочего стола. Любой сбой - значение,
/// а не паника.
pub trait WindowGateway: Send + Sync {
    /// Окно в фокусе; None - ожидаемая ситуация, а не ошибка
    fn focused_window(&self) -> Result<Option<WindowHandle>>;

    /// Текущий прямоугольник окна
    fn window_rect(&self, handle: WindowHandle) -> Result<Rect>;

    /// Рабочая область монитора, на котором находится окно
    /// (без панелей и доков)
    fn work_area(&self, handle: WindowHandle) -> Result<Rect>;

    /// Применить прямоугольник; StaleHandle если окно исчезло
    fn set_rect(&self, handle: WindowHandle, rect: Rect) -> Result<()>;

    /// Свернуть все окна активного рабочего стола, вернуть количество
    fn minimize_all(&self) -> Result<usize>;
}

/// Factory function to create an appropriate window gateway based on the dry_run flag
pub fn create_window_gateway(dry_run: bool) -> Result<Arc<dyn WindowGateway>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunGateway::new()))
    } else {
        let gateway = super::xdotool::XdotoolGateway::new();
        // Стартовая диагностика: без xdotool все действия будут промахиваться
        if let Err(e) = gateway.test() {
            tracing::warn!("Оконная подсистема недоступна при старте: {}", e);
        }
        Ok(Arc::new(gateway))
    }
}
