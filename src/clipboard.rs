use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Context;

/// Which delivery path ended up taking the write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipboardPath {
    Arboard,
    PlatformCommand,
}

/// Write `content` to the system clipboard: arboard first, then the
/// platform's own clipboard command. An error here is reported to the user
/// but never rolls back session state.
pub fn copy_to_clipboard(content: &str) -> anyhow::Result<ClipboardPath> {
    if try_arboard(content).is_ok() {
        return Ok(ClipboardPath::Arboard);
    }
    copy_with_platform_command(content)?;
    Ok(ClipboardPath::PlatformCommand)
}

fn try_arboard(content: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
    clipboard.set_text(content).context("set clipboard text")?;
    Ok(())
}

fn pipe_to_command(mut cmd: Command, label: &str, content: &str) -> anyhow::Result<()> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {label}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content.as_bytes())
            .with_context(|| format!("write to {label}"))?;
    }

    let output = child
        .wait_with_output()
        .with_context(|| format!("wait for {label}"))?;
    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow::anyhow!("{label} failed: {}", stderr.trim()))
    }
}

#[cfg(target_os = "linux")]
fn copy_with_platform_command(content: &str) -> anyhow::Result<()> {
    let is_wayland = std::env::var("WAYLAND_DISPLAY").is_ok()
        || std::env::var("XDG_SESSION_TYPE").is_ok_and(|s| s == "wayland");
    if is_wayland {
        pipe_to_command(Command::new("wl-copy"), "wl-copy", content)
    } else {
        let mut cmd = Command::new("xclip");
        cmd.args(["-selection", "clipboard"]);
        pipe_to_command(cmd, "xclip", content)
    }
}

#[cfg(target_os = "macos")]
fn copy_with_platform_command(content: &str) -> anyhow::Result<()> {
    pipe_to_command(Command::new("pbcopy"), "pbcopy", content)
}

#[cfg(target_os = "windows")]
fn copy_with_platform_command(content: &str) -> anyhow::Result<()> {
    pipe_to_command(Command::new("clip"), "clip.exe", content)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn copy_with_platform_command(_content: &str) -> anyhow::Result<()> {
    Err(anyhow::anyhow!("no clipboard command for this platform"))
}
