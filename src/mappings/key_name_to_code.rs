use global_hotkey::hotkey::Code;

/// Преобразование имён клавиш в коды global-hotkey
/// Отвечает за трансляцию строковых имён клавиш из конфигурации в Code
pub struct KeyNameToCode;

impl KeyNameToCode {
    /// Получить код клавиши по её нормализованному имени
    pub fn translate(key_name: &str) -> Option<Code> {
        let normalized = key_name.to_lowercase();
        let code = match normalized.as_str() {
            // Буквенные клавиши
            "a" => Code::KeyA,
            "b" => Code::KeyB,
            "c" => Code::KeyC,
            "d" => Code::KeyD,
            "e" => Code::KeyE,
            "f" => Code::KeyF,
            "g" => Code::KeyG,
            "h" => Code::KeyH,
            "i" => Code::KeyI,
            "j" => Code::KeyJ,
            "k" => Code::KeyK,
            "l" => Code::KeyL,
            "m" => Code::KeyM,
            "n" => Code::KeyN,
            "o" => Code::KeyO,
            "p" => Code::KeyP,
            "q" => Code::KeyQ,
            "r" => Code::KeyR,
            "s" => Code::KeyS,
            "t" => Code::KeyT,
            "u" => Code::KeyU,
            "v" => Code::KeyV,
            "w" => Code::KeyW,
            "x" => Code::KeyX,
            "y" => Code::KeyY,
            "z" => Code::KeyZ,

            // Цифровые клавиши (верхний ряд)
            "0" => Code::Digit0,
            "1" => Code::Digit1,
            "2" => Code::Digit2,
            "3" => Code::Digit3,
            "4" => Code::Digit4,
            "5" => Code::Digit5,
            "6" => Code::Digit6,
            "7" => Code::Digit7,
            "8" => Code::Digit8,
            "9" => Code::Digit9,

            // Функциональные клавиши
            "f1" => Code::F1,
            "f2" => Code::F2,
            "f3" => Code::F3,
            "f4" => Code::F4,
            "f5" => Code::F5,
            "f6" => Code::F6,
            "f7" => Code::F7,
            "f8" => Code::F8,
            "f9" => Code::F9,
            "f10" => Code::F10,
            "f11" => Code::F11,
            "f12" => Code::F12,

            // Специальные клавиши
            "space" => Code::Space,
            "enter" => Code::Enter,
            "escape" => Code::Escape,
            "backspace" => Code::Backspace,
            "tab" => Code::Tab,
            "insert" => Code::Insert,
            "delete" => Code::Delete,
            "home" => Code::Home,
            "end" => Code::End,
            "pageup" => Code::PageUp,
            "pagedown" => Code::PageDown,

            // Стрелки
            "up" => Code::ArrowUp,
            "down" => Code::ArrowDown,
            "left" => Code::ArrowLeft,
            "right" => Code::ArrowRight,

            // Знаки пунктуации (нормализованные имена)
            "comma" => Code::Comma,
            "period" => Code::Period,
            "slash" => Code::Slash,
            "backslash" => Code::Backslash,
            "semicolon" => Code::Semicolon,
            "apostrophe" => Code::Quote,
            "minus" => Code::Minus,
            "equal" => Code::Equal,
            "grave" => Code::Backquote,
            "leftbracket" => Code::BracketLeft,
            "rightbracket" => Code::BracketRight,

            _ => return None,
        };
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_letters_and_digits() {
        assert_eq!(KeyNameToCode::translate("h"), Some(Code::KeyH));
        assert_eq!(KeyNameToCode::translate("M"), Some(Code::KeyM));
        assert_eq!(KeyNameToCode::translate("5"), Some(Code::Digit5));
    }

    #[test]
    fn test_translate_punctuation_names() {
        assert_eq!(KeyNameToCode::translate("comma"), Some(Code::Comma));
        assert_eq!(KeyNameToCode::translate("leftbracket"), Some(Code::BracketLeft));
        assert_eq!(KeyNameToCode::translate("grave"), Some(Code::Backquote));
    }

    #[test]
    fn test_translate_unknown_name() {
        assert_eq!(KeyNameToCode::translate("hyperkey"), None);
    }
}
