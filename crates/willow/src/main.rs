//! Willow: hands-free local voice dictation with hold-to-talk and
//! double-tap latch hotkey gestures.

mod app;
mod app_command;
mod config;
mod delivery;
mod error;
mod focus;
mod gesture;
mod hotkey_handler;
mod logging;
mod modifier_guard;
mod paste_dispatcher;
mod session;
mod sound;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    modifier_guard::PasteKeyGuard,
    sound::IndicatorSounds,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::{config::Config, gesture::GestureStateMachine};

use std::{sync::Arc, time::Duration};

use global_hotkey::GlobalHotKeyManager;
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{Semaphore, mpsc, watch};
use tracing::error;
use willow_core::{TextFormatter, Transcriber};

/// Application entry point.
fn main() {
    // Config comes first: logging needs the filter and retention settings,
    // so failures here report to stderr only.
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {:?}", e);
        std::process::exit(1);
    }

    // The guard must outlive the event loop or buffered file log lines
    // are lost; it is moved into the closure below.
    let (log_guard, log_dir) = match logging::init(&config.logging) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:?}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    let mut config = Some(config);

    // Persists across event loop iterations -- dropping it unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetState(state) => {
                        if let Err(e) = tray_manager.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let Some(config) = config.take() else {
                    return;
                };

                let transcriber = match Transcriber::new(
                    &config.whisper.model_path,
                    config.whisper.use_gpu,
                    config.whisper.language.clone(),
                ) {
                    Ok(t) => Arc::new(t),
                    Err(e) => {
                        error!("Failed to load Whisper model: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let formatter = Arc::new(TextFormatter::new(config.format.compile()));

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // Register hotkey on the main thread -- tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                // hotkey_manager is stored in the closure's captured state so it
                // lives for the entire app lifetime.
                let (manager, hotkey_id) =
                    match HotkeyHandler::register_hotkey(&config.gesture.hotkey) {
                        Ok(pair) => pair,
                        Err(e) => {
                            error!("Failed to register hotkey: {:?}", e);
                            std::process::exit(1);
                        }
                    };
                hotkey_manager = Some(manager);

                let gesture = GestureStateMachine::new(
                    config.gesture.double_tap_latch,
                    Duration::from_millis(config.gesture.double_tap_window_ms),
                    Duration::from_millis(config.gesture.tap_max_ms),
                );
                let workers = Arc::new(Semaphore::new(config.whisper.workers));

                let tray_proxy = tray_proxy.clone();
                let open_log_menu_id = tray_manager.open_log_item_id().clone();
                let quit_menu_id = tray_manager.quit_item_id().clone();
                let log_dir = log_dir.clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let hotkey_handler = HotkeyHandler::new(hotkey_id, command_tx.clone());

                        // The rodio output stream is created on this thread
                        // and never leaves it.
                        let sounds = IndicatorSounds::new(&config.sound);

                        let app = App {
                            config,
                            transcriber,
                            formatter,
                            sounds,
                            tray_proxy,
                            command_tx,
                            command_rx,
                            shutdown_tx,
                            open_log_menu_id,
                            quit_menu_id,
                            log_dir,
                            gesture,
                            session: None,
                            next_seq: 0,
                            in_flight: 0,
                            workers,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager and the log guard alive for the app's lifetime.
        let _ = &hotkey_manager;
        let _ = &log_guard;
    });
}
