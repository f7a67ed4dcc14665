//! Engine running as a child process.
//!
//! One request per line on the child's stdin, one response per line on its
//! stdout, both JSON:
//!
//! ```text
//! > {"board":[[...25],[...25]],"dice":[3,1],"player":0,"score_moves":true,"cubeful":false}
//! < {"moves":[{"steps":[[7,4],[5,4]],"equity":0.152}]}
//! < {"error":"illegal dice"}
//! ```
//!
//! The process is spawned lazily on the first call and reused afterwards.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EngineBoard, EngineError, EngineMove, EvalFlags, MoveEngine};
use crate::board::Color;

#[derive(Serialize)]
struct Request<'a> {
    board: &'a EngineBoard,
    dice: [u8; 2],
    player: usize,
    score_moves: bool,
    cubeful: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Response {
    Moves { moves: Vec<EngineMove> },
    Failed { error: String },
}

struct Running {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// A [`MoveEngine`] backed by an external program.
pub struct ExternalEngine {
    program: String,
    args: Vec<String>,
    running: Option<Running>,
}

impl ExternalEngine {
    /// Creates an engine that will run `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        ExternalEngine {
            program: program.into(),
            args,
            running: None,
        }
    }

    /// Creates an engine from a whitespace-separated command line.
    /// Returns `None` for an empty command line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(ExternalEngine::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn running(&mut self) -> Result<&mut Running, EngineError> {
        if self.running.is_none() {
            debug!(program = %self.program, "spawning engine process");
            let mut child = Command::new(&self.program)
                .args(&self.args)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .spawn()
                .map_err(|e| EngineError::new(format!("failed to start {}: {}", self.program, e)))?;
            let stdin = child
                .stdin
                .take()
                .ok_or_else(|| EngineError::new("engine stdin unavailable"))?;
            let stdout = child
                .stdout
                .take()
                .ok_or_else(|| EngineError::new("engine stdout unavailable"))?;
            self.running = Some(Running {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            });
        }
        self.running
            .as_mut()
            .ok_or_else(|| EngineError::new("engine process not running"))
    }

    fn exchange(&mut self, request: &str) -> Result<String, EngineError> {
        let running = self.running()?;
        writeln!(running.stdin, "{}", request)
            .and_then(|_| running.stdin.flush())
            .map_err(|e| EngineError::new(format!("failed to write to engine: {}", e)))?;

        let mut line = String::new();
        let read = running
            .stdout
            .read_line(&mut line)
            .map_err(|e| EngineError::new(format!("failed to read from engine: {}", e)))?;
        if read == 0 {
            return Err(EngineError::new("engine closed its output"));
        }
        Ok(line)
    }

    /// Stops the child. A child still running once its stdin is closed is
    /// killed rather than waited on.
    fn shutdown(&mut self) {
        let Some(mut running) = self.running.take() else {
            return;
        };
        drop(running.stdin);
        match running.child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not poll engine process"),
        }
        if let Err(e) = running.child.kill() {
            warn!(error = %e, "failed to kill engine process");
        }
        if let Err(e) = running.child.wait() {
            warn!(error = %e, "engine process did not exit cleanly");
        }
    }
}

impl MoveEngine for ExternalEngine {
    fn find_moves(
        &mut self,
        board: &EngineBoard,
        dice: [u8; 2],
        player: Color,
        flags: EvalFlags,
    ) -> Result<Vec<EngineMove>, EngineError> {
        let request = serde_json::to_string(&Request {
            board,
            dice,
            player: player.index(),
            score_moves: flags.score_moves,
            cubeful: flags.cubeful,
        })
        .map_err(|e| EngineError::new(format!("failed to encode request: {}", e)))?;

        // A failed exchange or an unparsable line leaves the pipe out of step
        // with the requests; the process is dropped and respawned next call.
        let reply = match self.exchange(&request) {
            Ok(reply) => reply,
            Err(e) => {
                self.shutdown();
                return Err(e);
            }
        };

        match serde_json::from_str(reply.trim()) {
            Ok(Response::Moves { moves }) => Ok(moves),
            Ok(Response::Failed { error }) => Err(EngineError::new(error)),
            Err(e) => {
                self.shutdown();
                Err(EngineError::new(format!("malformed engine reply: {}", e)))
            }
        }
    }
}

impl Drop for ExternalEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
