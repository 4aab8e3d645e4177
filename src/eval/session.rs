//! # Interpreter Sessions
//!
//! A long-lived interpreter process that keeps its state between code
//! blocks, so a variable set on one slide is still there on the next.
//!
//! ```text
//! submit ──► stdin:  <block wrapped by the dialect>
//!                    print "<marker>:<status>"
//!        ◄── stdout: block output ... <marker>:0
//! ```
//!
//! Everything read from stdout before the marker is the block's output; the
//! number after it is the block's exit status. A session whose response was
//! never fully read (the caller timed out) or whose process has exited is
//! unusable and gets replaced by the evaluator.

use std::fmt::Write as _;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use super::evaluator::EvalError;

/// How much of the interpreter's stderr is kept for crash reports.
const STDERR_KEEP: usize = 4096;

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// How code is framed for a given interpreter so that it runs in the
/// session's global state and reports when it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// POSIX shells: the block runs as a `{ ... }` group in the current shell.
    Shell,
    /// CPython in interactive mode; the block is `exec`'d in `globals()`.
    Python,
}

impl Dialect {
    /// Picks a dialect from the interpreter's program name. `None` means the
    /// interpreter has no session framing and runs one process per block.
    pub fn detect(program: &str) -> Option<Dialect> {
        let name = program.rsplit('/').next().unwrap_or(program);
        match name {
            "sh" | "bash" | "dash" | "zsh" | "ksh" => Some(Dialect::Shell),
            _ if name.starts_with("python") => Some(Dialect::Python),
            _ => None,
        }
    }

    /// Flags appended to the configured command line.
    fn session_args(self) -> &'static [&'static str] {
        match self {
            Dialect::Shell => &[],
            // -i keeps reading stdin line by line, -u stops stdout buffering
            Dialect::Python => &["-i", "-q", "-u"],
        }
    }

    /// The text written to stdin for one block.
    pub fn frame(self, code: &str, marker: &str) -> String {
        match self {
            Dialect::Shell => {
                let mut script = String::from("{\n");
                script.push_str(code);
                if !code.ends_with('\n') {
                    script.push('\n');
                }
                script.push_str("} 2>&1 </dev/null\n");
                let _ = writeln!(script, "printf '%s%d\\n' '{marker}:' \"$?\"");
                script
            }
            Dialect::Python => {
                // The source travels as hex so no quoting can break the frame.
                let hex = code.bytes().fold(String::new(), |mut s, b| {
                    let _ = write!(s, "{b:02x}");
                    s
                });
                let mut script = String::new();
                let _ = writeln!(
                    script,
                    "try: exec(compile(bytes.fromhex('{hex}').decode('utf-8'), '<slide>', 'exec'), globals()); __podium_rc = 0"
                );
                script.push_str(
                    "except BaseException: __import__('traceback').print_exc(file=__import__('sys').stdout); __podium_rc = 1\n",
                );
                script.push('\n');
                let _ = writeln!(script, "print('{marker}:' + str(__podium_rc), flush=True)");
                script
            }
        }
    }
}

/// One running interpreter.
pub struct Session {
    dialect: Dialect,
    program: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr_tail: Arc<Mutex<String>>,
    marker: String,
    /// A block was written but its marker has not been read yet.
    in_flight: bool,
}

impl Session {
    /// Starts `argv` (plus the dialect's flags) with piped stdio.
    pub fn spawn(argv: &[String], dialect: Dialect) -> Result<Self, EvalError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| EvalError::Unavailable("empty interpreter command".into()))?;

        let mut child = Command::new(program)
            .args(args)
            .args(dialect.session_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EvalError::Unavailable(format!("failed to start `{program}`: {e}")))?;

        let stdin = child.stdin.take().ok_or(EvalError::ChannelClosed)?;
        let stdout = child.stdout.take().ok_or(EvalError::ChannelClosed)?;
        let stderr_tail = Arc::new(Mutex::new(String::new()));

        // Drain stderr so a chatty interpreter never blocks on a full pipe.
        if let Some(stderr) = child.stderr.take() {
            let tail = Arc::clone(&stderr_tail);
            tokio::spawn(async move {
                let mut reader = BufReader::new(stderr);
                let mut buf = Vec::new();
                while let Ok(n) = reader.read_until(b'\n', &mut buf).await {
                    if n == 0 {
                        break;
                    }
                    if let Ok(mut tail) = tail.lock() {
                        tail.push_str(&String::from_utf8_lossy(&buf));
                        if tail.len() > STDERR_KEEP {
                            let cut = tail.len() - STDERR_KEEP;
                            let cut = (cut..tail.len())
                                .find(|&i| tail.is_char_boundary(i))
                                .unwrap_or(cut);
                            tail.drain(..cut);
                        }
                    }
                    buf.clear();
                }
            });
        }

        let id = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
        info!("Started {:?} session {} ({})", dialect, id, program);
        Ok(Self {
            dialect,
            program: program.clone(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            stderr_tail,
            marker: format!("PODIUM_DONE_{}_{}", std::process::id(), id),
            in_flight: false,
        })
    }

    /// Whether the next block can be sent to this process.
    pub fn is_usable(&mut self) -> bool {
        !self.in_flight && matches!(self.child.try_wait(), Ok(None))
    }

    /// Runs one block and returns its output. A non-zero status becomes
    /// `Crashed`; so does the interpreter exiting before the marker.
    pub async fn run(&mut self, code: &str) -> Result<String, EvalError> {
        self.in_flight = true;
        let script = self.dialect.frame(code, &self.marker);
        debug!("Sending {} bytes to `{}`", script.len(), self.program);

        let written = async {
            self.stdin.write_all(script.as_bytes()).await?;
            self.stdin.flush().await
        }
        .await;
        if let Err(e) = written {
            warn!("Interpreter `{}` stopped accepting input: {}", self.program, e);
            return Err(self.exited(String::new()).await);
        }

        let mut output = String::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = self
                .stdout
                .read_until(b'\n', &mut line)
                .await
                .map_err(|_| EvalError::ChannelClosed)?;
            if n == 0 {
                return Err(self.exited(output).await);
            }
            let text = String::from_utf8_lossy(&line);
            let Some(pos) = text.find(&self.marker) else {
                output.push_str(&text);
                continue;
            };

            output.push_str(&text[..pos]);
            let status = text[pos + self.marker.len()..]
                .trim_start_matches(':')
                .trim()
                .to_string();
            self.in_flight = false;

            let output = output.trim_end_matches('\n').to_string();
            return if status == "0" {
                Ok(output)
            } else {
                let mut message = format!("exit status: {status}");
                if !output.is_empty() {
                    message.push('\n');
                    message.push_str(&output);
                }
                Err(EvalError::Crashed(message))
            };
        }
    }

    /// Builds the error for an interpreter that went away mid-block.
    async fn exited(&mut self, output: String) -> EvalError {
        let status = match self.child.wait().await {
            Ok(status) => status.to_string(),
            Err(e) => format!("unknown status ({e})"),
        };
        warn!("Interpreter `{}` exited: {}", self.program, status);

        let stderr = self
            .stderr_tail
            .lock()
            .map(|tail| tail.clone())
            .unwrap_or_default();
        let mut message = status;
        for part in [output.trim_end(), stderr.trim_end()] {
            if !part.is_empty() {
                message.push('\n');
                message.push_str(part);
            }
        }
        EvalError::Crashed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_dialect() {
        assert_eq!(Dialect::detect("sh"), Some(Dialect::Shell));
        assert_eq!(Dialect::detect("/usr/bin/bash"), Some(Dialect::Shell));
        assert_eq!(Dialect::detect("python3"), Some(Dialect::Python));
        assert_eq!(Dialect::detect("node"), None);
    }

    #[test]
    fn test_shell_frame_groups_block() {
        let script = Dialect::Shell.frame("X=1\necho $X", "M");
        assert_eq!(
            script,
            "{\nX=1\necho $X\n} 2>&1 </dev/null\nprintf '%s%d\\n' 'M:' \"$?\"\n"
        );
    }

    #[test]
    fn test_python_frame_hides_source() {
        let script = Dialect::Python.frame("print('hi')", "M");
        assert!(script.contains("7072696e74282768692729"));
        assert!(!script.contains("print('hi')"));
        assert!(script.ends_with("print('M:' + str(__podium_rc), flush=True)\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_session_keeps_state() {
        let mut session = Session::spawn(&["sh".to_string()], Dialect::Shell).unwrap();
        assert_eq!(session.run("X=42").await.unwrap(), "");
        assert_eq!(session.run("echo \"x=$X\"").await.unwrap(), "x=42");
        assert!(session.is_usable());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_failure_keeps_session() {
        let mut session = Session::spawn(&["sh".to_string()], Dialect::Shell).unwrap();
        let err = session.run("echo nope >&2\nfalse").await.unwrap_err();
        let EvalError::Crashed(message) = err else {
            panic!("expected crash, got {err:?}");
        };
        assert!(message.starts_with("exit status: 1"));
        assert!(message.contains("nope"));
        assert!(session.is_usable());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_makes_session_unusable() {
        let mut session = Session::spawn(&["sh".to_string()], Dialect::Shell).unwrap();
        assert!(matches!(session.run("exit 3").await, Err(EvalError::Crashed(_))));
        assert!(!session.is_usable());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_without_trailing_newline() {
        let mut session = Session::spawn(&["sh".to_string()], Dialect::Shell).unwrap();
        assert_eq!(session.run("printf abc").await.unwrap(), "abc");
    }
}
