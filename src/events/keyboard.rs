use crate::error::{HotwinError, Result};
use crate::mappings::KeyNameToCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    #[allow(dead_code)]
    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    #[allow(dead_code)]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    #[allow(dead_code)]
    pub fn with_super(mut self, super_key: bool) -> Self {
        self.super_key = super_key;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    pub fn to_vec(&self) -> Vec<String> {
        let mut result = Vec::new();
        if self.ctrl { result.push("ctrl".to_string()); }
        if self.alt { result.push("alt".to_string()); }
        if self.shift { result.push("shift".to_string()); }
        if self.super_key { result.push("super".to_string()); }
        result
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Комбинация клавиш: набор модификаторов плюс ровно одна основная клавиша.
/// Равенство - по множеству модификаторов и имени клавиши (порядок записи
/// в конфигурации значения не имеет).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCombination {
    pub modifiers: Modifiers,
    pub key: String,
}

impl KeyCombination {
    /// Разобрать комбинацию из строки вида "ctrl+shift+h".
    /// Символьные клавиши принимаются и как символ (","), и как имя ("comma") -
    /// оригинальные настройки исторически содержат оба варианта.
    pub fn parse(input: &str) -> Result<Self> {
        let mut modifiers = Modifiers::new();
        let mut key: Option<String> = None;

        for token in input.split('+') {
            // Пробел - символьная запись клавиши space, trim её уничтожил бы
            let token = if !token.is_empty() && token.chars().all(char::is_whitespace) {
                "space".to_string()
            } else {
                token.trim().to_lowercase()
            };
            if token.is_empty() {
                return Err(HotwinError::InvalidCombination(format!(
                    "пустой элемент в '{}'", input
                )));
            }

            match token.as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "super" | "meta" | "win" => modifiers.super_key = true,
                _ => {
                    let name = normalize_key_name(&token);
                    if KeyNameToCode::translate(&name).is_none() {
                        return Err(HotwinError::InvalidCombination(format!(
                            "неизвестная клавиша '{}' в '{}'", token, input
                        )));
                    }
                    if key.replace(name).is_some() {
                        return Err(HotwinError::InvalidCombination(format!(
                            "больше одной основной клавиши в '{}'", input
                        )));
                    }
                }
            }
        }

        let key = key.ok_or_else(|| {
            HotwinError::InvalidCombination(format!(
                "нет основной клавиши в '{}'", input
            ))
        })?;

        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// Нормализация имени клавиши: символы пунктуации приводятся к именам
fn normalize_key_name(token: &str) -> String {
    let collapsed: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    match collapsed.as_str() {
        "," => "comma".to_string(),
        "." => "period".to_string(),
        "/" => "slash".to_string(),
        "\\" => "backslash".to_string(),
        ";" => "semicolon".to_string(),
        "'" => "apostrophe".to_string(),
        "-" => "minus".to_string(),
        "=" => "equal".to_string(),
        "`" => "grave".to_string(),
        "[" => "leftbracket".to_string(),
        "]" => "rightbracket".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_combination() {
        let combo = KeyCombination::parse("ctrl+shift+h").unwrap();

        assert!(combo.modifiers.ctrl);
        assert!(combo.modifiers.shift);
        assert!(!combo.modifiers.alt);
        assert_eq!(combo.key, "h");
        assert_eq!(combo.to_string(), "ctrl+shift+h");
    }

    #[test]
    fn test_parse_is_order_independent() {
        let a = KeyCombination::parse("shift+ctrl+m").unwrap();
        let b = KeyCombination::parse("ctrl+shift+m").unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_symbol_and_name_are_equivalent() {
        let symbol = KeyCombination::parse("ctrl+alt+,").unwrap();
        let name = KeyCombination::parse("ctrl+alt+comma").unwrap();

        assert_eq!(symbol, name);
        assert_eq!(symbol.key, "comma");
    }

    #[test]
    fn test_parse_space_symbol_and_name_are_equivalent() {
        let symbol = KeyCombination::parse("ctrl+shift+ ").unwrap();
        let name = KeyCombination::parse("ctrl+shift+space").unwrap();

        assert_eq!(symbol, name);
        assert_eq!(symbol.key, "space");
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        assert!(KeyCombination::parse("ctrl+shift").is_err());
        assert!(KeyCombination::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_two_keys() {
        assert!(KeyCombination::parse("ctrl+a+b").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        assert!(KeyCombination::parse("ctrl+definitely_not_a_key").is_err());
    }

    #[test]
    fn test_bare_key_without_modifiers_is_allowed() {
        let combo = KeyCombination::parse("f11").unwrap();

        assert!(combo.modifiers.is_empty());
        assert_eq!(combo.key, "f11");
    }
}
