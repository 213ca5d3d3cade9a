//! Rule-string parser with per-line error collection.

use regex::Regex;

use super::EnvironmentMatcher;

/// A rejected rule line. Line numbers are 1-based over the full input,
/// counting blank lines.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("line {line}: expected exactly one '->' separator")]
    Separator { line: usize },
    #[error("line {line}: pattern must be enclosed in slashes, e.g. /regex/")]
    UnterminatedPattern { line: usize },
    #[error("line {line}: app name must be a single word without spaces")]
    InvalidAppName { line: usize },
    #[error("line {line}: invalid regex: {source}")]
    InvalidRegex {
        line: usize,
        #[source]
        source: Box<regex::Error>,
    },
}

impl RuleError {
    /// Input line the error was recorded on.
    pub fn line(&self) -> usize {
        match self {
            RuleError::Separator { line }
            | RuleError::UnterminatedPattern { line }
            | RuleError::InvalidAppName { line }
            | RuleError::InvalidRegex { line, .. } => *line,
        }
    }
}

/// Parse an environments rule string into an ordered matcher list.
///
/// Every line is checked even after the first failure so a broken
/// configuration reports all of its problems at once. Any failed line makes
/// the whole parse fail; no partial rule list is ever returned.
pub fn parse_rules(rules: &str) -> Result<Vec<EnvironmentMatcher>, Vec<RuleError>> {
    let mut matchers = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in rules.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, index + 1) {
            Ok(matcher) => matchers.push(matcher),
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(matchers)
    } else {
        Err(errors)
    }
}

fn parse_line(line: &str, number: usize) -> Result<EnvironmentMatcher, RuleError> {
    let parts: Vec<&str> = line.split("->").collect();
    if parts.len() != 2 {
        return Err(RuleError::Separator { line: number });
    }

    let pattern = parts[0].trim();
    if pattern.len() < 2 || !pattern.starts_with('/') || !pattern.ends_with('/') {
        return Err(RuleError::UnterminatedPattern { line: number });
    }

    let app = parts[1].trim();
    if app.is_empty() || app.contains(' ') {
        return Err(RuleError::InvalidAppName { line: number });
    }

    let regex = Regex::new(&pattern[1..pattern.len() - 1]).map_err(|err| {
        RuleError::InvalidRegex {
            line: number,
            source: Box::new(err),
        }
    })?;

    Ok(EnvironmentMatcher {
        regex,
        app: app.to_string(),
    })
}
