//! Speech recognition collaborators
//!
//! Dictation is delegated to an external program: it is started once per
//! listening session and whatever it prints on stdout is the transcript.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::RecognitionError;

/// Single-shot speech recognition
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once and yield the recognized transcript
    async fn recognize(&self) -> Result<String, RecognitionError>;
}

/// Stand-in used when no dictation program is configured
pub struct NoRecognizer;

#[async_trait]
impl SpeechRecognizer for NoRecognizer {
    async fn recognize(&self) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unavailable(
            "no speech_command configured".to_string(),
        ))
    }
}

/// Runs a dictation command and reads the transcript from its stdout
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    limit: Duration,
}

impl CommandRecognizer {
    /// Split a whitespace-separated command line; `None` if it is blank
    pub fn from_command_line(command_line: &str, limit: Duration) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;

        Some(Self {
            program,
            args: parts.collect(),
            limit,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self) -> Result<String, RecognitionError> {
        debug!("Starting dictation: {} {:?}", self.program, self.args);

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let run = command.output();

        let output = timeout(self.limit, run)
            .await
            .map_err(|_| RecognitionError::Aborted(format!("no transcript after {:?}", self.limit)))?
            .map_err(|e| RecognitionError::Unavailable(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RecognitionError::Aborted(if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            }));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(RecognitionError::NoSpeech);
        }

        Ok(transcript)
    }
}
