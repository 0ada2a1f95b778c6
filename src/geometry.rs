use serde::{Deserialize, Serialize};
use std::fmt;

/// Прямоугольник окна в экранных координатах
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Направление пошагового изменения размера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Expand,
    Shrink,
}

/// Новый размер = процент от рабочей области (округление до ближайшего пикселя).
/// Позиция сохраняется, но прижимается так, чтобы окно целиком осталось
/// в рабочей области. Процент валидируется вызывающей стороной (1..=100).
pub fn resize_to(rect: Rect, work_area: Rect, percent: u8) -> Rect {
    let width = ((work_area.width as u64 * percent as u64 + 50) / 100) as u32;
    let height = ((work_area.height as u64 * percent as u64 + 50) / 100) as u32;

    clamp_position(
        Rect::new(rect.x, rect.y, width, height),
        work_area,
    )
}

/// Центрирование окна без изменения размера. Идемпотентно.
pub fn center(rect: Rect, work_area: Rect) -> Rect {
    let x = work_area.x + (work_area.width as i64 - rect.width as i64) as i32 / 2;
    let y = work_area.y + (work_area.height as i64 - rect.height as i64) as i32 / 2;

    clamp_position(Rect::new(x, y, rect.width, rect.height), work_area)
}

/// Целевой прямоугольник для полноэкранного режима - рабочая область как есть
pub fn fullscreen(work_area: Rect) -> Rect {
    work_area
}

/// Пошаговое изменение размера с сохранением центра окна.
/// Expand расширяет окно на increment_px с каждой стороны (итого 2*increment_px
/// на ось), Shrink - обратная операция с нижней границей 2*increment_px
/// на каждое измерение (защита от вырожденных размеров).
pub fn step(rect: Rect, work_area: Rect, increment_px: u32, direction: StepDirection) -> Rect {
    let delta = increment_px * 2;
    let (width, height) = match direction {
        StepDirection::Expand => (rect.width + delta, rect.height + delta),
        StepDirection::Shrink => (
            rect.width.saturating_sub(delta).max(delta),
            rect.height.saturating_sub(delta).max(delta),
        ),
    };

    // Сохраняем прежний центр окна
    let x = rect.x + (rect.width as i64 - width as i64) as i32 / 2;
    let y = rect.y + (rect.height as i64 - height as i64) as i32 / 2;

    clamp_to(Rect::new(x, y, width, height), work_area)
}

/// Прижать позицию окна так, чтобы оно целиком оставалось в рабочей области.
/// Если окно больше рабочей области - выравниваем по её началу.
fn clamp_position(rect: Rect, work_area: Rect) -> Rect {
    let max_x = work_area.x + work_area.width as i32 - rect.width as i32;
    let max_y = work_area.y + work_area.height as i32 - rect.height as i32;

    let x = if max_x < work_area.x { work_area.x } else { rect.x.clamp(work_area.x, max_x) };
    let y = if max_y < work_area.y { work_area.y } else { rect.y.clamp(work_area.y, max_y) };

    Rect::new(x, y, rect.width, rect.height)
}

/// Прижать окно к рабочей области вместе с размером
fn clamp_to(rect: Rect, work_area: Rect) -> Rect {
    let width = rect.width.min(work_area.width);
    let height = rect.height.min(work_area.height);

    clamp_position(Rect::new(rect.x, rect.y, width, height), work_area)
}
