use crate::TrayIconState;

/// Commands sent from the async runtime to the main UI thread.
///
/// `TrayManager` is owned by the main thread (`TrayIcon` is `!Send`), so
/// icon updates and the final exit request travel through the tao event
/// loop as user events.
#[derive(Debug, Clone, Copy)]
pub enum TrayCommand {
    /// Switch the tray icon and tooltip to a new workflow state.
    SetState(TrayIconState),
    /// Exit the tao event loop and end the process.
    Shutdown,
}
