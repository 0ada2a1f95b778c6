use thiserror::Error;

#[derive(Error, Debug)]
pub enum HotwinError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Неверная комбинация клавиш: {0}")]
    InvalidCombination(String),

    #[error("Конфликт регистрации комбинации: {0}")]
    RegistrationConflict(String),

    #[error("Механизм горячих клавиш недоступен: {0}")]
    HookUnavailable(String),

    #[error("Устаревший дескриптор окна: {0}")]
    StaleHandle(String),

    #[error("Ошибка оконной подсистемы: {0}")]
    Gateway(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, HotwinError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! hotwin_error {
    (invalid_combination, $($arg:tt)*) => {
        $crate::error::HotwinError::InvalidCombination(format!($($arg)*))
    };
    (registration_conflict, $($arg:tt)*) => {
        $crate::error::HotwinError::RegistrationConflict(format!($($arg)*))
    };
    (hook_unavailable, $($arg:tt)*) => {
        $crate::error::HotwinError::HookUnavailable(format!($($arg)*))
    };
    (stale_handle, $($arg:tt)*) => {
        $crate::error::HotwinError::StaleHandle(format!($($arg)*))
    };
    (gateway, $($arg:tt)*) => {
        $crate::error::HotwinError::Gateway(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::HotwinError::Internal(format!($($arg)*))
    };
}
