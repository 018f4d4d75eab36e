//! Focused-application probe.
//!
//! The paste filter needs the identifier of whichever application holds
//! input focus at paste time (not recording time; the user may switch
//! apps while speaking). On macOS this asks System Events; elsewhere no
//! probe is available and the filter sees `None`.

use tracing::warn;

/// Reports which application currently holds input focus.
pub trait FocusProbe: Send {
    /// Name of the frontmost application, if it can be determined.
    fn focused_app(&self) -> Option<String>;
}

/// macOS probe backed by a System Events AppleScript query.
#[cfg(target_os = "macos")]
pub struct SystemEventsProbe;

#[cfg(target_os = "macos")]
impl FocusProbe for SystemEventsProbe {
    fn focused_app(&self) -> Option<String> {
        let output = std::process::Command::new("osascript")
            .arg("-e")
            .arg(
                "tell application \"System Events\" to get name of first \
                 application process whose frontmost is true",
            )
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let name = String::from_utf8_lossy(&out.stdout).trim().to_string();
                (!name.is_empty()).then_some(name)
            }
            Ok(out) => {
                warn!(status = ?out.status, "Focus query returned non-zero status");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to run focus query");
                None
            }
        }
    }
}

/// Fallback probe for platforms without a focus query; always `None`.
pub struct NullProbe;

impl FocusProbe for NullProbe {
    fn focused_app(&self) -> Option<String> {
        None
    }
}

/// The best probe available on this platform.
pub fn platform_probe() -> Box<dyn FocusProbe> {
    #[cfg(target_os = "macos")]
    {
        Box::new(SystemEventsProbe)
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(NullProbe)
    }
}
