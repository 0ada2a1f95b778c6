use crate::events::{ActionType, HotkeyBinding, KeyCombination};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Нижняя и верхняя границы шага изменения размера (пиксели)
pub const MIN_INCREMENT_PX: u32 = 5;
pub const MAX_INCREMENT_PX: u32 = 150;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub resize: ResizeConfig,
    pub health: HealthConfig,
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResizeConfig {
    /// Пикселей на один шаг Expand/Shrink, диапазон [5, 150]
    pub increment_px: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    /// Интервал цикла самовосстановления регистраций
    pub check_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SequenceConfig {
    /// Окно подтверждения двухступенчатого жеста
    pub timeout_ms: u64,
}

/// Привязка из конфигурационного файла: строки разбираются при валидации
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BindingConfig {
    pub keys: String,
    pub action: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "hotwin_rust=info".to_string(),
            },
            resize: ResizeConfig { increment_px: 25 },
            health: HealthConfig { check_interval_secs: 5 },
            sequence: SequenceConfig { timeout_ms: 2000 },
            // Жест "свернуть все окна" был зашит в оригинальном приложении
            bindings: vec![
                BindingConfig {
                    keys: "ctrl+shift+h".to_string(),
                    action: "minimize-arm".to_string(),
                },
                BindingConfig {
                    keys: "ctrl+shift+m".to_string(),
                    action: "minimize-confirm".to_string(),
                },
            ],
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("HOTWIN_"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация шага изменения размера
        if self.resize.increment_px < MIN_INCREMENT_PX || self.resize.increment_px > MAX_INCREMENT_PX {
            anyhow::bail!(
                "increment_px должно быть в диапазоне [{}, {}], получено {}",
                MIN_INCREMENT_PX,
                MAX_INCREMENT_PX,
                self.resize.increment_px
            );
        }

        // Валидация цикла самовосстановления
        if self.health.check_interval_secs == 0 {
            anyhow::bail!("check_interval_secs должно быть больше 0");
        }

        // Валидация таймаута жеста
        if self.sequence.timeout_ms < 100 {
            anyhow::bail!("timeout_ms должно быть минимум 100");
        }

        // Валидация привязок: комбинация и действие должны разбираться
        for (i, binding) in self.bindings.iter().enumerate() {
            KeyCombination::parse(&binding.keys)
                .map_err(|e| anyhow::anyhow!("Привязка #{}: {}", i + 1, e))?;
            ActionType::parse(&binding.action)
                .map_err(|e| anyhow::anyhow!("Привязка #{}: {}", i + 1, e))?;
        }

        Ok(())
    }

    /// Собрать разобранный набор привязок для передачи в реестр.
    /// Дубликаты комбинаций здесь не отбрасываются - при rebuild побеждает
    /// последняя запись.
    pub fn hotkey_bindings(&self) -> Result<Vec<HotkeyBinding>> {
        self.bindings
            .iter()
            .map(|binding| {
                let combination = KeyCombination::parse(&binding.keys)
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                let action = ActionType::parse(&binding.action)
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                Ok(HotkeyBinding::new(combination, action))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ActionType;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_contains_minimize_sequence() {
        let bindings = Config::default().hotkey_bindings().unwrap();

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].action, ActionType::MinimizeAllArm);
        assert_eq!(bindings[1].action, ActionType::MinimizeAllConfirm);
    }

    #[test]
    fn test_validate_rejects_bad_increment() {
        let mut config = Config::default();
        config.resize.increment_px = 4;
        assert!(config.validate().is_err());

        config.resize.increment_px = 151;
        assert!(config.validate().is_err());

        config.resize.increment_px = 150;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_binding() {
        let mut config = Config::default();
        config.bindings.push(BindingConfig {
            keys: "ctrl+shift".to_string(),
            action: "center".to_string(),
        });
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.bindings.push(BindingConfig {
            keys: "ctrl+alt+8".to_string(),
            action: "resize:250".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hotkey_bindings_parses_resize_percent() {
        let mut config = Config::default();
        config.bindings = vec![BindingConfig {
            keys: "ctrl+alt+8".to_string(),
            action: "resize:80".to_string(),
        }];

        let bindings = config.hotkey_bindings().unwrap();
        assert_eq!(bindings[0].action, ActionType::ResizePercent(80));
        assert_eq!(bindings[0].combination.to_string(), "ctrl+alt+8");
    }
}
