use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

use super::{NarrativeError, NarrativeGenerator};

/// Runs an external program per prompt: prompt on stdin, narrative on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a config list whose first element is the program.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl NarrativeGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        debug!(program = %self.program, bytes = prompt.len(), "running narrative command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| NarrativeError::Unavailable(format!("{}: {}", self.program, e)))?;

        // stdin is fed concurrently with draining stdout
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_string();
            thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| NarrativeError::Unavailable(e.to_string()))?;

        let written = match writer {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
            None => Ok(()),
        };

        // A non-zero exit is reported even when the write hit a closed pipe
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NarrativeError::Failed {
                status: output.status.code(),
                message: stderr.trim().chars().take(500).collect(),
            });
        }

        if let Err(e) = written {
            return Err(NarrativeError::Unavailable(format!(
                "failed to write stdin: {e}"
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
