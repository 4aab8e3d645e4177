//! # Command Evaluator
//!
//! Runs code blocks through external interpreters. Each language tag maps to
//! a command line.
//!
//! Shells and Python get one long-lived [`Session`] per language, so state
//! carries from block to block the way it does in a live REPL. Any other
//! interpreter runs once per block: the source goes to stdin and stdout
//! comes back as the response.
//!
//! Children are spawned with `kill_on_drop`. When the bridge gives up on a
//! slow block, the one-shot process dies with the dropped future; a session
//! is left mid-response and is replaced before the next block runs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;

use super::evaluator::{EvalError, Evaluator};
use super::session::{Dialect, Session};
use super::types::EvalRequest;

/// Language tag → interpreter command used when the config names none.
pub const DEFAULT_INTERPRETERS: &[(&str, &[&str])] = &[
    ("sh", &["sh"]),
    ("shell", &["sh"]),
    ("bash", &["bash"]),
    ("python", &["python3"]),
    ("py", &["python3"]),
    ("ruby", &["ruby"]),
    ("rb", &["ruby"]),
    ("node", &["node"]),
    ("js", &["node"]),
    ("javascript", &["node"]),
];

pub struct CommandEvaluator {
    interpreters: HashMap<String, Vec<String>>,
    /// Live sessions keyed by lowercase language tag.
    sessions: Mutex<HashMap<String, Session>>,
}

impl Default for CommandEvaluator {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl CommandEvaluator {
    /// Builds an evaluator from the built-in table, with `overrides` taking
    /// precedence per language.
    pub fn new(overrides: HashMap<String, Vec<String>>) -> Self {
        let mut interpreters: HashMap<String, Vec<String>> = DEFAULT_INTERPRETERS
            .iter()
            .map(|(lang, argv)| {
                (
                    lang.to_string(),
                    argv.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        for (lang, argv) in overrides {
            if argv.is_empty() {
                warn!("Ignoring empty interpreter command for '{}'", lang);
                continue;
            }
            interpreters.insert(lang.to_lowercase(), argv);
        }
        Self {
            interpreters,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The command line used for `language`, if any.
    pub fn interpreter_for(&self, language: &str) -> Option<&[String]> {
        self.interpreters
            .get(&language.to_lowercase())
            .map(|v| v.as_slice())
    }

    /// Runs `code` in the language's session, starting or replacing the
    /// session first when needed.
    async fn run_in_session(
        &self,
        language: &str,
        argv: &[String],
        dialect: Dialect,
        code: &str,
    ) -> Result<String, EvalError> {
        let mut sessions = self.sessions.lock().await;
        let key = language.to_lowercase();
        if sessions.get_mut(&key).is_some_and(|s| !s.is_usable()) {
            info!("Replacing stale '{}' session", key);
            sessions.remove(&key);
        }
        let session = match sessions.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(Session::spawn(argv, dialect)?)
            }
        };
        session.run(code).await
    }
}

/// Runs one process for one block.
async fn run_once(argv: &[String], code: String) -> Result<String, EvalError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| EvalError::Unavailable("empty interpreter command".into()))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| EvalError::Unavailable(format!("failed to start `{program}`: {e}")))?;

    let mut stdin = child.stdin.take().ok_or(EvalError::ChannelClosed)?;
    let mut code = code;
    if !code.ends_with('\n') {
        code.push('\n');
    }
    // An interpreter may exit before reading everything; its output
    // still tells the presenter what happened.
    if let Err(e) = stdin.write_all(code.as_bytes()).await {
        warn!("Interpreter `{}` closed stdin early: {}", program, e);
    }
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .map_err(|_| EvalError::ChannelClosed)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.success() {
        Ok(stdout.trim_end_matches('\n').to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut message = output.status.to_string();
        for part in [stdout.trim_end(), stderr.trim_end()] {
            if !part.is_empty() {
                message.push('\n');
                message.push_str(part);
            }
        }
        Err(EvalError::Crashed(message))
    }
}

#[async_trait]
impl Evaluator for CommandEvaluator {
    fn name(&self) -> &str {
        "command"
    }

    async fn submit(&self, request: EvalRequest) -> Result<String, EvalError> {
        let language = request
            .language
            .as_deref()
            .ok_or_else(|| EvalError::Unavailable("code block has no language tag".into()))?;
        let argv = self
            .interpreter_for(language)
            .ok_or_else(|| EvalError::Unavailable(format!("no interpreter for '{language}'")))?;
        let program = argv
            .first()
            .ok_or_else(|| EvalError::Unavailable(format!("no interpreter for '{language}'")))?;

        match Dialect::detect(program) {
            Some(dialect) => {
                debug!("Running '{}' block in {:?} session", language, dialect);
                self.run_in_session(language, argv, dialect, &request.code)
                    .await
            }
            None => {
                debug!("Spawning interpreter {:?} for '{}'", argv, language);
                run_once(argv, request.code).await
            }
        }
    }
}
