//! Ordered option rule tables.
//!
//! Tokens are matched left to right against a table of rules; each rule
//! mutates the parse target. Parsing stops at `--` (consumed), at the
//! first token no rule accepts (kept), or when a rule finishes it. Every
//! token after the stop point is returned untouched as pass-through.

use osaft_docker_core::error::{OsaftError, Result};

/// What the parser does after a rule was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Token consumed, continue with the next one
    Continue,
    /// Token consumed, everything after it is pass-through
    Finish,
    /// Token not accepted; it starts the pass-through arguments
    Reject,
}

enum Matcher {
    /// Token equals one of the names
    Exact(Vec<String>),
    /// Token starts with `-name=`; the rest is the value
    Value(String),
}

type Apply<T> = Box<dyn Fn(&mut T, &str) -> Result<Flow> + Send + Sync>;

/// A token pattern and its effect on the parse target.
pub struct Rule<T> {
    matcher: Matcher,
    apply: Apply<T>,
}

impl<T> Rule<T> {
    /// Rule for a flag or keyword with one or more spellings.
    pub fn exact<F>(names: &[&str], apply: F) -> Self
    where
        F: Fn(&mut T, &str) -> Result<Flow> + Send + Sync + 'static,
    {
        Self {
            matcher: Matcher::Exact(names.iter().map(|n| n.to_string()).collect()),
            apply: Box::new(apply),
        }
    }

    /// Rule for a `-name=value` option. Empty values are rejected with an error.
    pub fn value<F>(prefix: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&mut T, &str) -> Result<Flow> + Send + Sync + 'static,
    {
        Self {
            matcher: Matcher::Value(prefix.into()),
            apply: Box::new(apply),
        }
    }

    /// Match a token, returning the value handed to `apply`.
    fn matches<'a>(&self, token: &'a str) -> Option<&'a str> {
        match &self.matcher {
            Matcher::Exact(names) => names.iter().any(|n| n == token).then_some(token),
            Matcher::Value(prefix) => token.strip_prefix(prefix.as_str()),
        }
    }

    fn name(&self) -> &str {
        match &self.matcher {
            Matcher::Exact(names) => names.first().map(String::as_str).unwrap_or(""),
            Matcher::Value(prefix) => prefix,
        }
    }

    fn is_value(&self) -> bool {
        matches!(self.matcher, Matcher::Value(_))
    }
}

/// Ordered rules; the first matching rule wins.
pub struct RuleTable<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleTable<T> {
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { rules }
    }

    /// Apply `args` to `target`, returning the pass-through arguments.
    pub fn parse(&self, target: &mut T, args: &[String]) -> Result<Vec<String>> {
        for (index, token) in args.iter().enumerate() {
            if token == "--" {
                return Ok(args[index + 1..].to_vec());
            }
            let Some((rule, value)) = self.lookup(token) else {
                tracing::debug!(token = %token, "Unrecognised token, stop parsing");
                return Ok(args[index..].to_vec());
            };
            if rule.is_value() && value.is_empty() {
                return Err(OsaftError::Config(format!(
                    "option '{}' needs a value",
                    rule.name()
                )));
            }
            match (rule.apply)(target, value)? {
                Flow::Continue => {}
                Flow::Finish => return Ok(args[index + 1..].to_vec()),
                Flow::Reject => return Ok(args[index..].to_vec()),
            }
        }
        Ok(Vec::new())
    }

    fn lookup<'a>(&self, token: &'a str) -> Option<(&Rule<T>, &'a str)> {
        self.rules
            .iter()
            .find_map(|rule| rule.matches(token).map(|value| (rule, value)))
    }
}
