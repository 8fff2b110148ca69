use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::warn;

use crate::error::{Result, SplitError};

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Pipes the text into an external program such as `wl-copy` or `pbcopy`.
#[derive(Clone, Debug, Default)]
pub struct CommandClipboard {
    command: Option<Vec<String>>,
}

impl CommandClipboard {
    /// `command` is split on whitespace; `None` or a blank string disables copying.
    pub fn new(command: Option<&str>) -> Self {
        let command = command
            .map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self { command }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let Some((program, args)) = self.command.as_ref().and_then(|c| c.split_first()) else {
            return Err(SplitError::Clipboard {
                reason: "no clipboard command configured".to_string(),
            });
        };

        let clipboard_error = |what: &str, err: std::io::Error| SplitError::Clipboard {
            reason: format!("{what} {program}: {err}"),
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| clipboard_error("failed to start", err))?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(text.as_bytes()).await {
                drop(stdin);
                // Reap it so no zombie is left behind
                let _ = child.kill().await;
                return Err(clipboard_error("failed to write to", err));
            }
        }
        let status = child
            .wait()
            .await
            .map_err(|err| clipboard_error("failed to wait for", err))?;
        if status.success() {
            Ok(())
        } else {
            Err(SplitError::Clipboard {
                reason: format!("{program} exited with {status}"),
            })
        }
    }
}

/// Copies `link`, logging and swallowing any failure.
pub async fn copy_link(link: &str, clipboard: &dyn Clipboard) -> bool {
    match clipboard.write_text(link).await {
        Ok(()) => true,
        Err(err) => {
            warn!("Failed to copy link to clipboard: {err}");
            false
        }
    }
}
