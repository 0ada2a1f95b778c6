use super::r#trait::{WindowGateway, WindowHandle};
use crate::error::{HotwinError, Result};
use crate::geometry::Rect;
use std::process::Command;
use tracing::debug;

/// Шлюз оконной подсистемы поверх xdotool/wmctrl
pub struct XdotoolGateway;

impl XdotoolGateway {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = Command::new("xdotool").args(["version"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(HotwinError::Gateway("xdotool failed".to_string()))
        }
    }

    /// Индекс активного рабочего стола и его рабочая область из wmctrl -d
    fn current_desktop(&self) -> Result<(u32, Rect)> {
        let output = Command::new("wmctrl")
            .args(["-d"])
            .output()
            .map_err(|e| HotwinError::Gateway(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(HotwinError::Gateway("wmctrl -d вернул ошибку".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            if let Some(parsed) = parse_desktop_line(line) {
                return Ok(parsed);
            }
        }

        Err(HotwinError::Gateway("Активный рабочий стол не найден".to_string()))
    }
}

impl WindowGateway for XdotoolGateway {
    fn focused_window(&self) -> Result<Option<WindowHandle>> {
        debug!("Запрос активного окна через xdotool");
        let output = Command::new("xdotool")
            .args(["getactivewindow"])
            .output()
            .map_err(|e| HotwinError::Gateway(format!("xdotool не найден: {}", e)))?;

        // Ненулевой статус означает "нет окна в фокусе" - ожидаемое состояние
        if !output.status.success() {
            debug!("xdotool: нет активного окна");
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let id: u64 = stdout.trim().parse().map_err(|_| {
            HotwinError::Gateway(format!("Неожиданный вывод xdotool: '{}'", stdout.trim()))
        })?;

        Ok(Some(WindowHandle(id)))
    }

    fn window_rect(&self, handle: WindowHandle) -> Result<Rect> {
        let output = Command::new("xdotool")
            .args(["getwindowgeometry", "--shell", &handle.0.to_string()])
            .output()
            .map_err(|e| HotwinError::Gateway(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            return Err(HotwinError::StaleHandle(format!(
                "окно {} больше не существует", handle
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_shell_geometry(&stdout).ok_or_else(|| {
            HotwinError::Gateway(format!("Не удалось разобрать геометрию окна {}", handle))
        })
    }

    /// Приближение: wmctrl знает только рабочую область активного рабочего
    /// стола, дескриптор окна не учитывается. На одном мониторе это и есть
    /// область его монитора; на нескольких окна чужих мониторов получат
    /// область активного.
    fn work_area(&self, _handle: WindowHandle) -> Result<Rect> {
        // Панели и доки уже вычтены оконным менеджером
        let (_, work_area) = self.current_desktop()?;
        Ok(work_area)
    }

    fn set_rect(&self, handle: WindowHandle, rect: Rect) -> Result<()> {
        let id = handle.0.to_string();

        let moved = Command::new("xdotool")
            .args(["windowmove", &id, &rect.x.to_string(), &rect.y.to_string()])
            .output()
            .map_err(|e| HotwinError::Gateway(format!("xdotool не найден: {}", e)))?;

        let sized = Command::new("xdotool")
            .args(["windowsize", &id, &rect.width.to_string(), &rect.height.to_string()])
            .output()
            .map_err(|e| HotwinError::Gateway(format!("xdotool не найден: {}", e)))?;

        if !moved.status.success() || !sized.status.success() {
            return Err(HotwinError::StaleHandle(format!(
                "не удалось применить {} к окну {}", rect, handle
            )));
        }

        debug!("Окну {} применён прямоугольник {}", handle, rect);
        Ok(())
    }

    fn minimize_all(&self) -> Result<usize> {
        let (desktop, _) = self.current_desktop()?;

        let output = Command::new("wmctrl")
            .args(["-l"])
            .output()
            .map_err(|e| HotwinError::Gateway(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(HotwinError::Gateway("wmctrl -l вернул ошибку".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut count = 0;
        for handle in parse_window_list(&stdout, desktop) {
            let minimized = Command::new("xdotool")
                .args(["windowminimize", &handle.0.to_string()])
                .output();

            match minimized {
                Ok(out) if out.status.success() => count += 1,
                _ => debug!("Не удалось свернуть окно {}", handle),
            }
        }

        Ok(count)
    }
}

/// Разбор строки активного рабочего стола из wmctrl -d:
/// `0  * DG: 1920x1080  VP: 0,0  WA: 0,25 1920x1055  Desktop`
fn parse_desktop_line(line: &str) -> Option<(u32, Rect)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 || parts[1] != "*" {
        return None;
    }

    let desktop: u32 = parts[0].parse().ok()?;
    let wa_pos = parts.iter().position(|p| *p == "WA:")?;

    let (x, y) = parts.get(wa_pos + 1)?.split_once(',')?;
    let (width, height) = parts.get(wa_pos + 2)?.split_once('x')?;

    Some((
        desktop,
        Rect::new(
            x.parse().ok()?,
            y.parse().ok()?,
            width.parse().ok()?,
            height.parse().ok()?,
        ),
    ))
}

/// Разбор вывода xdotool getwindowgeometry --shell (строки KEY=VALUE)
fn parse_shell_geometry(output: &str) -> Option<Rect> {
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;

    for line in output.lines() {
        if let Some((key, value)) = line.trim().split_once('=') {
            match key {
                "X" => x = value.parse().ok(),
                "Y" => y = value.parse().ok(),
                "WIDTH" => width = value.parse().ok(),
                "HEIGHT" => height = value.parse().ok(),
                _ => {}
            }
        }
    }

    Some(Rect::new(x?, y?, width?, height?))
}

/// Окна заданного рабочего стола из wmctrl -l:
/// `0x04000007  0 host Заголовок окна`
fn parse_window_list(output: &str, desktop: u32) -> Vec<WindowHandle> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return None;
            }
            let on_desktop: i64 = parts[1].parse().ok()?;
            if on_desktop != desktop as i64 {
                return None;
            }
            let id = u64::from_str_radix(parts[0].trim_start_matches("0x"), 16).ok()?;
            Some(WindowHandle(id))
        })
        .collect()
}
