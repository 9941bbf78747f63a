//! Code/text rendering via silicon
//!
//! Produces a styled PNG from a source file or from literal text using the
//! external `silicon` tool with a fixed Dracula theme. A missing tool and a
//! failing tool are the same soft `None` signal; the caller decides whether
//! to abort.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

const RENDER_BIN: &str = "silicon";

/// Render the contents of `input` into a PNG under `dir`.
pub fn render_file(input: &Path, dir: &Path) -> Option<PathBuf> {
    render_file_with(RENDER_BIN, input, dir)
}

/// Render literal `text` into a PNG under `dir`.
///
/// The text goes through a scratch file that is removed on every exit path:
/// the temp-file guard deletes it on drop, success or failure alike.
pub fn render_text(text: &str, dir: &Path) -> Option<PathBuf> {
    render_text_with(RENDER_BIN, text, dir)
}

fn render_file_with(tool: &str, input: &Path, dir: &Path) -> Option<PathBuf> {
    let output = dir.join(format!("render-{}.png", chrono::Utc::now().timestamp_millis()));
    run_renderer(tool, input, &output, true)
}

fn render_text_with(tool: &str, text: &str, dir: &Path) -> Option<PathBuf> {
    let mut scratch = match tempfile::Builder::new()
        .prefix("render-")
        .suffix(".txt")
        .tempfile_in(dir)
    {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(error = %e, "cannot create scratch file for render");
            return None;
        }
    };
    if let Err(e) = scratch.write_all(text.as_bytes()).and_then(|_| scratch.flush()) {
        tracing::warn!(error = %e, "cannot write scratch file for render");
        return None;
    }

    let output = dir.join(format!("render-{}.png", chrono::Utc::now().timestamp_millis()));
    run_renderer(tool, scratch.path(), &output, false)
    // scratch dropped here, deleting the temp file on both outcomes
}

fn run_renderer(tool: &str, input: &Path, output: &Path, window_controls: bool) -> Option<PathBuf> {
    let mut cmd = Command::new(tool);
    cmd.arg(input)
        .arg("-o")
        .arg(output)
        .args(["--theme", "Dracula"])
        .args(["--shadow-color", "#555555"])
        .args(["--shadow-blur-radius", "30"])
        .args(["--pad-horiz", "40"])
        .args(["--pad-vert", "40"]);
    if window_controls {
        cmd.args(["--background", "#00000000"]);
    } else {
        cmd.arg("--no-window-controls");
    }

    match cmd.status() {
        Ok(status) if status.success() && output.exists() => Some(output.to_path_buf()),
        Ok(status) => {
            tracing::warn!(%status, "render failed");
            None
        }
        Err(e) => {
            tracing::warn!(tool, error = %e, "render tool unavailable");
            None
        }
    }
}
