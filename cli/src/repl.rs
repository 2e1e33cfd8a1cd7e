//! Interactive read-eval-print loop.
//!
//! [`Session`] holds the line-accumulation logic so it can be driven without
//! a terminal; [`run_repl`] wires it to a rustyline editor.

use std::path::PathBuf;

use ok::{Environment, Error, Value, analyze_balance, eval_str};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

const PROMPT: &str = "ok> ";
const CONTINUATION_PROMPT: &str = "ok* ";
const SOURCE_NAME: &str = "<stdin>";
const HISTORY_FILE: &str = ".ok_history";

/// Result of feeding one line to a [`Session`].
#[derive(Debug)]
pub enum Outcome {
    /// The accumulated form evaluated successfully.
    Value(Value),
    /// The form is still open; `depth` delimiters are owed.
    Incomplete { depth: usize },
    /// Evaluation or parsing failed; the pending buffer was discarded.
    Error(Error),
}

pub struct Session {
    env: Environment,
    pending: Vec<String>,
    depth: usize,
}

impl Session {
    pub fn new(env: Environment) -> Self {
        Session {
            env,
            pending: Vec::new(),
            depth: 0,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn is_continuing(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Prompt for the next line, indented by the number of open forms.
    pub fn prompt(&self) -> String {
        if self.is_continuing() {
            format!("{CONTINUATION_PROMPT}{}", "  ".repeat(self.depth))
        } else {
            PROMPT.to_string()
        }
    }

    /// Drop a partially entered form.
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.depth = 0;
    }

    pub fn feed(&mut self, line: &str) -> Outcome {
        self.pending.push(line.to_string());
        let source = self.pending.join(" ");

        match eval_str(SOURCE_NAME, &source, &mut self.env) {
            Ok(value) => {
                self.cancel();
                self.env.set("_", value.clone());
                Outcome::Value(value)
            }
            Err(Error::Syntax(err)) if err.is_incomplete() => match analyze_balance(&source) {
                Some(depth) if depth > 0 => {
                    debug!(depth, "form continues on next line");
                    self.depth = depth;
                    Outcome::Incomplete { depth }
                }
                _ => {
                    self.cancel();
                    Outcome::Error(Error::Syntax(err))
                }
            },
            Err(err) => {
                self.cancel();
                Outcome::Error(err)
            }
        }
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}

/// Run the interactive loop until end of input or Ctrl-C on an empty line.
pub fn run_repl(env: Environment) -> Result<(), ReadlineError> {
    let mut editor = DefaultEditor::new()?;
    let history = history_path();
    if let Some(path) = &history {
        if let Err(e) = editor.load_history(path) {
            debug!("no history loaded from {}: {e}", path.display());
        }
    }

    let mut session = Session::new(env);
    loop {
        let line = match editor.readline(&session.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) if session.is_continuing() => {
                session.cancel();
                continue;
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        };

        match session.feed(&line) {
            Outcome::Value(value) => {
                editor.add_history_entry(line.as_str())?;
                println!("{value}");
            }
            Outcome::Incomplete { .. } => {
                editor.add_history_entry(line.as_str())?;
            }
            Outcome::Error(err) => println!("error: {err}"),
        }
    }

    if let Some(path) = &history {
        if let Err(e) = editor.save_history(path) {
            warn!("could not save history to {}: {e}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ok::default_environment;

    #[test]
    fn test_prompt_indents_while_continuing() {
        let mut session = Session::new(default_environment());
        assert_eq!(session.prompt(), "ok> ");
        assert!(matches!(
            session.feed("(list (id"),
            Outcome::Incomplete { depth: 2 }
        ));
        assert_eq!(session.prompt(), "ok*     ");
    }

    #[test]
    fn test_cancel_resets_prompt() {
        let mut session = Session::new(default_environment());
        session.feed("(id");
        session.cancel();
        assert!(!session.is_continuing());
        assert_eq!(session.prompt(), "ok> ");
    }
}
