//! Interactive screen capture
//!
//! Wraps the macOS `screencapture` utility in window-pick mode. The user may
//! cancel the capture; cancellation, a missing tool, and tool failure all
//! collapse into the same soft `None` signal. The caller decides whether to
//! abort.

use std::path::{Path, PathBuf};
use std::process::Command;

const CAPTURE_BIN: &str = "screencapture";

/// Prompt the user to pick a window and capture it into `dir`.
///
/// Blocks until the capture completes or is cancelled. Returns the path of
/// the new image, or `None` if nothing was captured.
pub fn capture_window(dir: &Path) -> Option<PathBuf> {
    capture_window_with(CAPTURE_BIN, dir)
}

fn capture_window_with(tool: &str, dir: &Path) -> Option<PathBuf> {
    let filename = format!("screenshot-{}.png", chrono::Utc::now().timestamp_millis());
    let path = dir.join(filename);

    // -w: interactive window selection, -o: no window shadow
    let status = Command::new(tool).arg("-wo").arg(&path).status();

    match status {
        Ok(status) if status.success() && path.exists() => Some(path),
        Ok(status) => {
            tracing::warn!(%status, "capture cancelled or failed");
            None
        }
        Err(e) => {
            tracing::warn!(tool, error = %e, "capture tool unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_tool_is_soft_failure() {
        let dir = TempDir::new().unwrap();
        assert!(capture_window_with("xpost-no-such-capture-tool", dir.path()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_failure_is_soft_failure() {
        let dir = TempDir::new().unwrap();
        assert!(capture_window_with("false", dir.path()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_capture_returns_new_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        // Stand-in capture tool: touches the target path it is given.
        let tool = dir.path().join("fake-capture.sh");
        std::fs::write(&tool, "#!/bin/sh\ntouch \"$2\"\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let out = dir.path().join("shots");
        std::fs::create_dir_all(&out).unwrap();

        let captured = capture_window_with(tool.to_str().unwrap(), &out).unwrap();
        assert!(captured.exists());
        assert!(captured.extension().is_some_and(|e| e == "png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_without_file_is_soft_failure() {
        // A cancelled capture can exit 0 without writing anything.
        let dir = TempDir::new().unwrap();
        assert!(capture_window_with("true", dir.path()).is_none());
    }
}
