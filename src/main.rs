use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
mod geometry;
pub mod mappings;
mod services;
mod utils;

use config::Config;
use services::{
    create_key_hook, create_window_gateway, ActionExecutor, Dispatcher, HotkeyRegistry,
    SequenceDetector,
};

#[derive(Parser, Debug)]
#[command(name = "hotwin-rust")]
#[command(about = "Демон управления геометрией окон по глобальным горячим клавишам")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "hotwin.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск Hotwin Rust v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    // Инициализация компонентов: обе границы с ОС создаются фабриками
    let gateway = create_window_gateway(args.dry_run)?;
    let hook = create_key_hook(args.dry_run)?;

    let executor = Arc::new(ActionExecutor::new(gateway, config.resize.increment_px));
    let detector = SequenceDetector::new(
        executor.clone(),
        Duration::from_millis(config.sequence.timeout_ms),
    );
    let registry = Arc::new(HotkeyRegistry::new(hook.clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        registry.clone(),
        executor.clone(),
        detector,
        hook,
    ));

    // Первичная установка привязок
    registry.rebuild(config.hotkey_bindings()?)?;
    let (registered, total) = registry.status();
    info!("Активно привязок: {}/{}", registered, total);

    info!("Все компоненты инициализированы");

    // Запуск сервисов параллельно
    let dispatcher_handle = tokio::spawn(async move {
        if let Err(e) = dispatcher.run().await {
            error!("Ошибка в Dispatcher: {}", e);
        }
    });
    let health_registry = registry.clone();
    let health_interval = Duration::from_secs(config.health.check_interval_secs);
    let health_handle = tokio::spawn(async move {
        health_registry.run_health_loop(health_interval).await;
    });

    // Внешние команды: SIGUSR1 - ручное восстановление привязок
    // ("recover now" из трея), SIGHUP - перечитать конфигурацию
    let signal_registry = registry.clone();
    let signal_executor = executor.clone();
    let config_path = args.config.clone();
    let signals_handle = tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};

        let mut usr1 = match signal(SignalKind::user_defined1()) {
            Ok(s) => s,
            Err(e) => {
                error!("Не удалось подписаться на SIGUSR1: {}", e);
                return;
            }
        };
        let mut hup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                error!("Не удалось подписаться на SIGHUP: {}", e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = usr1.recv() => {
                    if signal_registry.recover() {
                        let (registered, total) = signal_registry.status();
                        info!("Восстановление завершено: {}/{} привязок", registered, total);
                    }
                }
                _ = hup.recv() => {
                    match Config::load(&config_path) {
                        Ok(config) => {
                            signal_executor.set_increment(config.resize.increment_px);
                            match config.hotkey_bindings() {
                                Ok(bindings) => {
                                    if let Err(e) = signal_registry.rebuild(bindings) {
                                        error!("Пересборка привязок не удалась: {}", e);
                                    } else {
                                        let (registered, total) = signal_registry.status();
                                        info!("Конфигурация перечитана: {}/{} привязок", registered, total);
                                    }
                                }
                                Err(e) => error!("Ошибка привязок в конфигурации: {}", e),
                            }
                        }
                        Err(e) => error!("Не удалось перечитать конфигурацию: {}", e),
                    }
                }
            }
        }
    });

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");

    // Снимаем все регистрации, чтобы не оставить комбинации занятыми
    registry.stop();

    // Прерываем задачи
    dispatcher_handle.abort();
    health_handle.abort();
    signals_handle.abort();

    // Ожидаем завершения задач (с таймаутом)
    let shutdown_timeout = Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = dispatcher_handle.await;
        let _ = health_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("Hotwin Rust завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
