use crate::error::{HotwinError, Result};
use crate::events::KeyCombination;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Действие над геометрией окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Изменить размер до процента рабочей области (1..=100)
    ResizePercent(u8),
    Center,
    Fullscreen,
    Expand,
    Shrink,
    /// Первая ступень жеста "свернуть все окна"
    MinimizeAllArm,
    /// Вторая ступень жеста, должна прийти в течение таймаута
    MinimizeAllConfirm,
}

impl ActionType {
    /// Разобрать действие из строки конфигурации:
    /// "resize:80", "center", "fullscreen", "expand", "shrink",
    /// "minimize-arm", "minimize-confirm"
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim().to_lowercase();

        if let Some(percent) = input.strip_prefix("resize:") {
            let percent: u8 = percent.trim().parse().map_err(|_| {
                HotwinError::Config(anyhow::anyhow!("Неверный процент в '{}'", input))
            })?;
            if percent == 0 || percent > 100 {
                return Err(HotwinError::Config(anyhow::anyhow!(
                    "Процент должен быть в диапазоне 1..=100, получено {}",
                    percent
                )));
            }
            return Ok(ActionType::ResizePercent(percent));
        }

        match input.as_str() {
            "center" => Ok(ActionType::Center),
            "fullscreen" => Ok(ActionType::Fullscreen),
            "expand" => Ok(ActionType::Expand),
            "shrink" => Ok(ActionType::Shrink),
            "minimize-arm" => Ok(ActionType::MinimizeAllArm),
            "minimize-confirm" => Ok(ActionType::MinimizeAllConfirm),
            _ => Err(HotwinError::Config(anyhow::anyhow!(
                "Неизвестное действие: '{}'",
                input
            ))),
        }
    }

    /// Действия-ступени жеста обрабатываются детектором последовательности,
    /// а не напрямую исполнителем
    pub fn is_sequence_stage(&self) -> bool {
        matches!(self, ActionType::MinimizeAllArm | ActionType::MinimizeAllConfirm)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::ResizePercent(p) => write!(f, "resize:{}", p),
            ActionType::Center => write!(f, "center"),
            ActionType::Fullscreen => write!(f, "fullscreen"),
            ActionType::Expand => write!(f, "expand"),
            ActionType::Shrink => write!(f, "shrink"),
            ActionType::MinimizeAllArm => write!(f, "minimize-arm"),
            ActionType::MinimizeAllConfirm => write!(f, "minimize-confirm"),
        }
    }
}

/// Привязка комбинации клавиш к действию
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub combination: KeyCombination,
    pub action: ActionType,
}

impl HotkeyBinding {
    pub fn new(combination: KeyCombination, action: ActionType) -> Self {
        Self { combination, action }
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.combination, self.action)
    }
}

/// Состояние регистрации комбинации в механизме горячих клавиш
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Registered,
    Unregistered,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resize_percent() {
        assert_eq!(ActionType::parse("resize:80").unwrap(), ActionType::ResizePercent(80));
        assert_eq!(ActionType::parse("resize:1").unwrap(), ActionType::ResizePercent(1));
        assert_eq!(ActionType::parse("resize:100").unwrap(), ActionType::ResizePercent(100));
    }

    #[test]
    fn test_parse_rejects_invalid_percent() {
        assert!(ActionType::parse("resize:0").is_err());
        assert!(ActionType::parse("resize:101").is_err());
        assert!(ActionType::parse("resize:abc").is_err());
    }

    #[test]
    fn test_parse_named_actions() {
        assert_eq!(ActionType::parse("center").unwrap(), ActionType::Center);
        assert_eq!(ActionType::parse("Fullscreen").unwrap(), ActionType::Fullscreen);
        assert_eq!(ActionType::parse("minimize-arm").unwrap(), ActionType::MinimizeAllArm);
        assert!(ActionType::parse("explode").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let actions = [
            ActionType::ResizePercent(60),
            ActionType::Center,
            ActionType::Expand,
            ActionType::MinimizeAllConfirm,
        ];
        for action in actions {
            assert_eq!(ActionType::parse(&action.to_string()).unwrap(), action);
        }
    }

    #[test]
    fn test_sequence_stage_detection() {
        assert!(ActionType::MinimizeAllArm.is_sequence_stage());
        assert!(ActionType::MinimizeAllConfirm.is_sequence_stage());
        assert!(!ActionType::Center.is_sequence_stage());
        assert!(!ActionType::ResizePercent(50).is_sequence_stage());
    }
}
