use crate::gesture::HotkeyEvent;

/// Commands sent from the hotkey handler to the main application.
#[derive(Debug, Clone, Copy)]
pub enum AppCommand {
    /// A raw dictation-hotkey transition, timestamped at arrival. The
    /// gesture state machine in the app loop interprets it.
    Hotkey(HotkeyEvent),
    /// Request application shutdown.
    Shutdown,
}
