//! Typed recipe instructions and their Dockerfile rendering.
//!
//! Instructions are plain records; quoting and line continuation are
//! handled here so the generator never builds Dockerfile text itself.

use std::fmt;

/// Continuation used between the steps of a `RUN` block.
const RUN_JOIN: &str = " && \\\n    ";

/// A single recipe instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `# <text>`
    Comment(String),
    /// `FROM <image>`
    From { image: String },
    /// `LABEL <key>="<value>"`
    Label { key: String, value: String },
    /// `ENV <key>=<value>`
    Env { key: String, value: String },
    /// `ARG <name>[=<default>]`
    Arg {
        name: String,
        default: Option<String>,
    },
    /// `WORKDIR <path>`
    Workdir { path: String },
    /// `COPY <src> <dst>`, source taken from the build context
    Copy { src: String, dst: String },
    /// `ADD <url> <dst>`, remote source fetched by the engine
    Add { src: String, dst: String },
    /// `RUN a && b && c`, one layer for all steps
    Run { steps: Vec<String> },
    /// `USER <user>`
    User { user: String },
    /// `ENTRYPOINT ["exec", "form"]`
    Entrypoint { exec: Vec<String> },
    /// `CMD ["exec", "form"]`
    Cmd { exec: Vec<String> },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "# {}", text),
            Self::From { image } => write!(f, "FROM {}", image),
            Self::Label { key, value } => write!(f, "LABEL {}={}", key, quote(value)?),
            Self::Env { key, value } => {
                if value.contains(char::is_whitespace) || value.contains('"') {
                    write!(f, "ENV {}={}", key, quote(value)?)
                } else {
                    write!(f, "ENV {}={}", key, value)
                }
            }
            Self::Arg { name, default } => match default {
                Some(value) => write!(f, "ARG {}={}", name, value),
                None => write!(f, "ARG {}", name),
            },
            Self::Workdir { path } => write!(f, "WORKDIR {}", path),
            Self::Copy { src, dst } => write!(f, "COPY {} {}", src, dst),
            Self::Add { src, dst } => write!(f, "ADD {} {}", src, dst),
            Self::Run { steps } => write!(f, "RUN {}", steps.join(RUN_JOIN)),
            Self::User { user } => write!(f, "USER {}", user),
            Self::Entrypoint { exec } => write!(f, "ENTRYPOINT {}", exec_form(exec)?),
            Self::Cmd { exec } => write!(f, "CMD {}", exec_form(exec)?),
        }
    }
}

/// Ordered list of instructions making up a build recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    pub instructions: Vec<Instruction>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Number of `RUN` blocks (one engine layer each).
    pub fn run_blocks(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Run { .. }))
            .count()
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, instruction) in self.instructions.iter().enumerate() {
            // Blank line before each comment so blocks stand apart
            if index > 0 && matches!(instruction, Instruction::Comment(_)) {
                writeln!(f)?;
            }
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

/// Double-quote a value with JSON escaping.
fn quote(value: &str) -> Result<String, fmt::Error> {
    serde_json::to_string(value).map_err(|_| fmt::Error)
}

/// Render an exec-form array, e.g. `["perl", "o-saft.pl"]`.
fn exec_form(exec: &[String]) -> Result<String, fmt::Error> {
    let parts = exec.iter().map(|s| quote(s)).collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", parts.join(", ")))
}
