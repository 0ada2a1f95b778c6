use super::r#trait::KeyHook;
use crate::debug_if_enabled;
use crate::error::{HotwinError, Result};
use crate::events::KeyCombination;
use crate::mappings::KeyNameToCode;
use dashmap::DashMap;
use global_hotkey::{
    hotkey::{HotKey, Modifiers as HotkeyModifiers},
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use parking_lot::Mutex;
use tracing::info;

/// Реальный механизм горячих клавиш поверх крейта global-hotkey
pub struct GlobalHotKeyHook {
    manager: Mutex<GlobalHotKeyManager>,
    // Обратный индекс: id сработавшей клавиши -> комбинация
    by_id: DashMap<u32, KeyCombination>,
}

impl GlobalHotKeyHook {
    pub fn new() -> Result<Self> {
        info!("Инициализация механизма глобальных горячих клавиш");

        let manager = GlobalHotKeyManager::new().map_err(|e| {
            HotwinError::HookUnavailable(format!("не удалось создать менеджер: {}", e))
        })?;

        Ok(Self {
            manager: Mutex::new(manager),
            by_id: DashMap::new(),
        })
    }

    fn to_hotkey(combination: &KeyCombination) -> Result<HotKey> {
        let code = KeyNameToCode::translate(&combination.key).ok_or_else(|| {
            HotwinError::InvalidCombination(format!("неизвестная клавиша '{}'", combination.key))
        })?;

        let mut modifiers = HotkeyModifiers::empty();
        if combination.modifiers.ctrl {
            modifiers |= HotkeyModifiers::CONTROL;
        }
        if combination.modifiers.alt {
            modifiers |= HotkeyModifiers::ALT;
        }
        if combination.modifiers.shift {
            modifiers |= HotkeyModifiers::SHIFT;
        }
        if combination.modifiers.super_key {
            modifiers |= HotkeyModifiers::META;
        }

        let modifiers = if modifiers.is_empty() { None } else { Some(modifiers) };
        Ok(HotKey::new(modifiers, code))
    }
}

impl KeyHook for GlobalHotKeyHook {
    fn register(&self, combination: &KeyCombination) -> Result<()> {
        let hotkey = Self::to_hotkey(combination)?;

        self.manager.lock().register(hotkey).map_err(|e| {
            HotwinError::RegistrationConflict(format!("{}: {}", combination, e))
        })?;

        self.by_id.insert(hotkey.id(), combination.clone());
        debug_if_enabled!("Комбинация {} зарегистрирована (id {})", combination, hotkey.id());
        Ok(())
    }

    fn unregister(&self, combination: &KeyCombination) -> Result<()> {
        let hotkey = Self::to_hotkey(combination)?;

        self.manager.lock().unregister(hotkey).map_err(|e| {
            HotwinError::Internal(format!("не удалось снять {}: {}", combination, e))
        })?;

        self.by_id.remove(&hotkey.id());
        debug_if_enabled!("Комбинация {} снята с регистрации", combination);
        Ok(())
    }

    fn try_recv(&self) -> Option<KeyCombination> {
        // Отпускания и незнакомые id пропускаем, но очередь дочитываем
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state() != HotKeyState::Pressed {
                continue;
            }
            if let Some(combination) = self.by_id.get(&event.id()) {
                return Some(combination.clone());
            }
            debug_if_enabled!("Событие с незнакомым id {}", event.id());
        }
        None
    }
}
