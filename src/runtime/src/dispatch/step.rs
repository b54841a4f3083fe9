//! Steps of a dispatch plan and their shell rendering.

use std::fmt;
use std::path::PathBuf;

/// An external engine invocation: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EngineCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// One unit of work; local file operations or an engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Create a directory that must not exist yet
    CreateDir(PathBuf),
    WriteFile { path: PathBuf, contents: String },
    CopyFile { from: PathBuf, to: PathBuf },
    Engine(EngineCommand),
    RemoveFile(PathBuf),
    RemoveDir(PathBuf),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir(path) => write!(f, "mkdir {}", quote_path(path)),
            Self::WriteFile { path, contents } => {
                write!(f, "cat > {} << 'EOF'\n{}", quote_path(path), contents)?;
                if !contents.ends_with('\n') {
                    writeln!(f)?;
                }
                write!(f, "EOF")
            }
            Self::CopyFile { from, to } => {
                write!(f, "cp {} {}", quote_path(from), quote_path(to))
            }
            Self::Engine(command) => write!(f, "{}", command),
            Self::RemoveFile(path) => write!(f, "rm -f {}", quote_path(path)),
            Self::RemoveDir(path) => write!(f, "rm -rf {}", quote_path(path)),
        }
    }
}

/// Ordered steps of one terminal action.
///
/// `chain` stops at the first failing step. `cleanup` runs afterwards,
/// but only if the first chain step succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub chain: Vec<Step>,
    pub cleanup: Vec<Step>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan with a single engine command.
    pub fn engine(command: EngineCommand) -> Self {
        Self {
            chain: vec![Step::Engine(command)],
            cleanup: Vec::new(),
        }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.chain.push(step);
        self
    }

    pub fn finally(mut self, step: Step) -> Self {
        self.cleanup.push(step);
        self
    }

    /// Every step in execution order, cleanup last.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.chain.iter().chain(self.cleanup.iter())
    }
}

fn quote_path(path: &std::path::Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// Quote a word for display in a POSIX shell command line.
pub fn shell_quote(word: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c);
    if !word.is_empty() && word.chars().all(safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
