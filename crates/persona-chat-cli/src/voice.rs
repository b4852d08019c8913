//! Voice input and output
//!
//! Both directions are optional capabilities backed by external commands. A
//! missing command yields `Voice::Unavailable` and the client keeps working
//! with typed input only.

use anyhow::{bail, Context, Result};
use std::process::{Child, Command, Stdio};

use crate::config::split_command;

/// Platform capability that may be absent
#[derive(Debug)]
pub enum Voice<T> {
    Available(T),
    Unavailable,
}

impl<T> Voice<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Voice::Available(_))
    }
}

impl<T> From<Option<T>> for Voice<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Voice::Available(inner),
            None => Voice::Unavailable,
        }
    }
}

pub trait SpeechRecognizer {
    /// Capture one utterance. `Ok(None)` means nothing was heard.
    fn recognize(&mut self) -> Result<Option<String>>;
}

pub trait SpeechSynthesizer {
    fn speak(&mut self, text: &str) -> Result<()>;
    fn cancel(&mut self);
    fn is_speaking(&mut self) -> bool;
}

impl<S: SpeechSynthesizer> Voice<S> {
    /// Speak `text`, cutting off whatever is still playing
    pub fn announce(&mut self, text: &str) -> Result<bool> {
        match self {
            Voice::Available(synth) => {
                synth.cancel();
                synth.speak(text)?;
                Ok(true)
            }
            Voice::Unavailable => Ok(false),
        }
    }

    pub fn silence(&mut self) {
        if let Voice::Available(synth) = self {
            synth.cancel();
        }
    }
}

impl<R: SpeechRecognizer> Voice<R> {
    pub fn listen(&mut self) -> Option<Result<Option<String>>> {
        match self {
            Voice::Available(recognizer) => Some(recognizer.recognize()),
            Voice::Unavailable => None,
        }
    }
}

/// Speaks through an external program such as `espeak` or `say`
#[derive(Debug)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    current: Option<Child>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current: None,
        }
    }

    pub fn from_config(command: Option<&str>) -> Voice<Self> {
        command
            .and_then(split_command)
            .map(|(program, args)| Self::new(program, args))
            .into()
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&mut self, text: &str) -> Result<()> {
        self.cancel();
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start speech command '{}'", self.program))?;
        self.current = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.current.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn is_speaking(&mut self) -> bool {
        match self.current.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs an external recognizer that prints one transcript to stdout
#[derive(Debug)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(command: Option<&str>) -> Voice<Self> {
        command
            .and_then(split_command)
            .map(|(program, args)| Self::new(program, args))
            .into()
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn recognize(&mut self) -> Result<Option<String>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("Failed to start recognition command '{}'", self.program))?;

        if !output.status.success() {
            bail!("Recognition command exited with {}", output.status);
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!transcript.is_empty()).then_some(transcript))
    }
}
