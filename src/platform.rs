//! Platform-specific configuration

/// Submit shortcut display for form help text
/// Ctrl+S works on all platforms
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

/// Add-row shortcut display
/// - macOS: "Cmd+N"
/// - Linux/Windows: "Ctrl+N"
#[cfg(target_os = "macos")]
pub const ADD_ROW_SHORTCUT: &str = "Cmd+N";

#[cfg(not(target_os = "macos"))]
pub const ADD_ROW_SHORTCUT: &str = "Ctrl+N";

/// Remove-row shortcut display
/// - macOS: "Cmd+D"
/// - Linux/Windows: "Ctrl+D"
#[cfg(target_os = "macos")]
pub const REMOVE_ROW_SHORTCUT: &str = "Cmd+D";

#[cfg(not(target_os = "macos"))]
pub const REMOVE_ROW_SHORTCUT: &str = "Ctrl+D";
