//! # Narration
//!
//! Speaks step descriptions out loud by shelling out to a local TTS
//! command (espeak-ng by default, anything configurable). The engine and
//! reducer know nothing about audio — they emit strings, this module turns
//! them into subprocess invocations.
//!
//! Implementations live behind the `Narrator` trait so the event loop can
//! hold a `Box<dyn Narrator>` and tests can substitute a silent one.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use crate::core::config::ResolvedConfig;
use crate::core::phrases::Locale;

/// One sentence to speak, plus the locale it is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationRequest {
    pub text: String,
    pub locale: Locale,
}

#[derive(Debug)]
pub enum NarrationError {
    /// The TTS command could not be started at all.
    Spawn(std::io::Error),
    /// The command ran but exited non-zero.
    Failed(Option<i32>),
    Timeout,
}

impl fmt::Display for NarrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrationError::Spawn(e) => write!(f, "failed to start narration command: {e}"),
            NarrationError::Failed(Some(code)) => {
                write!(f, "narration command exited with status {code}")
            }
            NarrationError::Failed(None) => write!(f, "narration command killed by signal"),
            NarrationError::Timeout => write!(f, "narration command timed out"),
        }
    }
}

impl std::error::Error for NarrationError {}

#[async_trait]
pub trait Narrator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Speak the request to completion.
    async fn speak(&self, request: &NarrationRequest) -> Result<(), NarrationError>;
}

// ============================================================================
// CommandNarrator
// ============================================================================

/// A sentence should never take this long to speak.
const SPEAK_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs `command [args..] <text>` per request. `{lang}` in an argument
/// expands to the locale's BCP-47 tag, so the default invocation is
/// `espeak-ng -v pt-BR "<text>"`.
pub struct CommandNarrator {
    command: String,
    args: Vec<String>,
}

impl CommandNarrator {
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self { command, args }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            config.narration_command.clone(),
            config.narration_args.clone(),
        )
    }

    fn expanded_args(&self, locale: Locale) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{lang}", locale.tag()))
            .collect()
    }
}

#[async_trait]
impl Narrator for CommandNarrator {
    fn name(&self) -> &str {
        &self.command
    }

    async fn speak(&self, request: &NarrationRequest) -> Result<(), NarrationError> {
        debug!("Narrating via {}: {}", self.command, request.text);
        let mut child = Command::new(&self.command)
            .args(self.expanded_args(request.locale))
            .arg(&request.text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            // The task gets aborted when a newer sentence supersedes this
            // one; the child must not outlive it.
            .kill_on_drop(true)
            .spawn()
            .map_err(NarrationError::Spawn)?;

        let status = match tokio::time::timeout(SPEAK_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(NarrationError::Spawn(e)),
            Err(_) => {
                warn!("Narration command exceeded {SPEAK_TIMEOUT:?}, killing it");
                let _ = child.kill().await;
                return Err(NarrationError::Timeout);
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(NarrationError::Failed(status.code()))
        }
    }
}

// ============================================================================
// SilentNarrator
// ============================================================================

/// Does nothing. Used when no TTS command is available and in tests.
pub struct SilentNarrator;

#[async_trait]
impl Narrator for SilentNarrator {
    fn name(&self) -> &str {
        "silent"
    }

    async fn speak(&self, _request: &NarrationRequest) -> Result<(), NarrationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, locale: Locale) -> NarrationRequest {
        NarrationRequest {
            text: text.to_string(),
            locale,
        }
    }

    #[test]
    fn test_lang_placeholder_expands_to_locale_tag() {
        let narrator = CommandNarrator::new(
            "espeak-ng".to_string(),
            vec!["-v".to_string(), "{lang}".to_string()],
        );
        assert_eq!(narrator.expanded_args(Locale::PtBr), vec!["-v", "pt-BR"]);
        assert_eq!(narrator.expanded_args(Locale::En), vec!["-v", "en-US"]);
    }

    #[tokio::test]
    async fn test_successful_command_is_ok() {
        let narrator = CommandNarrator::new("true".to_string(), vec![]);
        let result = narrator.speak(&request("4 mais 6", Locale::PtBr)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failing_command_reports_exit_code() {
        let narrator = CommandNarrator::new("false".to_string(), vec![]);
        let result = narrator.speak(&request("4 mais 6", Locale::PtBr)).await;
        assert!(matches!(result, Err(NarrationError::Failed(Some(1)))));
    }

    #[tokio::test]
    async fn test_missing_command_is_a_spawn_error() {
        let narrator = CommandNarrator::new("soma-no-such-tts-command".to_string(), vec![]);
        let result = narrator.speak(&request("ola", Locale::PtBr)).await;
        assert!(matches!(result, Err(NarrationError::Spawn(_))));
    }

    #[tokio::test]
    async fn test_in_flight_narration_can_be_aborted() {
        // `sleep 5` stands in for a long sentence being spoken.
        let narrator = CommandNarrator::new("sleep".to_string(), vec![]);
        let handle =
            tokio::spawn(async move { narrator.speak(&request("5", Locale::PtBr)).await });
        let abort = handle.abort_handle();

        tokio::time::sleep(Duration::from_millis(50)).await;
        abort.abort();
        let joined = handle.await;
        assert!(joined.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_silent_narrator_always_succeeds() {
        let narrator = SilentNarrator;
        assert_eq!(narrator.name(), "silent");
        assert!(narrator.speak(&request("anything", Locale::En)).await.is_ok());
    }
}
