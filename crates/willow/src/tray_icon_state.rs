/// Tray icon states corresponding to the dictation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready to start recording.
    Idle,
    /// A recording session is active.
    Recording,
    /// No active recording, but transcriptions are still in flight.
    Processing,
}
