use super::r#trait::{WindowGateway, WindowHandle};
use crate::error::{HotwinError, Result};
use crate::geometry::Rect;
use parking_lot::Mutex;
use tracing::info;

/// Шлюз-эмуляция: одно окно в фокусе и фиксированная рабочая область.
/// Используется в режиме --dry-run и как дублёр в тестах исполнителя.
pub struct DryRunGateway {
    state: Mutex<DryState>,
}

#[derive(Debug)]
struct DryState {
    focused: Option<WindowHandle>,
    rect: Rect,
    work_area: Rect,
    fail_set_rect: bool,
    applied: Vec<Rect>,
    minimize_calls: usize,
    window_count: usize,
}

impl DryRunGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DryState {
                focused: Some(WindowHandle(0x1)),
                rect: Rect::new(100, 100, 800, 600),
                work_area: Rect::new(0, 25, 1920, 1055),
                fail_set_rect: false,
                applied: Vec::new(),
                minimize_calls: 0,
                window_count: 3,
            }),
        }
    }

    #[allow(dead_code)]
    pub fn set_focused(&self, focused: Option<WindowHandle>) {
        self.state.lock().focused = focused;
    }

    #[allow(dead_code)]
    pub fn set_window_rect(&self, rect: Rect) {
        self.state.lock().rect = rect;
    }

    #[allow(dead_code)]
    pub fn set_work_area(&self, work_area: Rect) {
        self.state.lock().work_area = work_area;
    }

    /// Следующие вызовы set_rect будут завершаться StaleHandle
    #[allow(dead_code)]
    pub fn fail_set_rect(&self, fail: bool) {
        self.state.lock().fail_set_rect = fail;
    }

    /// Все применённые прямоугольники в порядке вызовов
    #[allow(dead_code)]
    pub fn applied_rects(&self) -> Vec<Rect> {
        self.state.lock().applied.clone()
    }

    #[allow(dead_code)]
    pub fn minimize_calls(&self) -> usize {
        self.state.lock().minimize_calls
    }
}

impl Default for DryRunGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowGateway for DryRunGateway {
    fn focused_window(&self) -> Result<Option<WindowHandle>> {
        Ok(self.state.lock().focused)
    }

    fn window_rect(&self, _handle: WindowHandle) -> Result<Rect> {
        Ok(self.state.lock().rect)
    }

    fn work_area(&self, _handle: WindowHandle) -> Result<Rect> {
        Ok(self.state.lock().work_area)
    }

    fn set_rect(&self, handle: WindowHandle, rect: Rect) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_set_rect {
            return Err(HotwinError::StaleHandle(format!(
                "окно {} больше не существует", handle
            )));
        }

        info!("[DRY RUN] Окну {} применён прямоугольник {}", handle, rect);
        state.rect = rect;
        state.applied.push(rect);
        Ok(())
    }

    fn minimize_all(&self) -> Result<usize> {
        let mut state = self.state.lock();
        state.minimize_calls += 1;
        info!("[DRY RUN] Свёрнуто {} окон активного рабочего стола", state.window_count);
        Ok(state.window_count)
    }
}
