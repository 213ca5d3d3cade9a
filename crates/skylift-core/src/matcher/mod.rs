//! Branch-to-app environment matching.
//!
//! An environments rule string pairs branch regexes with target apps:
//!
//! ```text
//! /^refs\/heads\/main$/ -> production
//! /^refs\/heads\/release-.*/ -> staging
//! ```
//!
//! Rules are evaluated in declaration order; the first regex that matches
//! the branch reference wins. No match means the deployment is skipped.

pub mod parser;

use regex::Regex;

pub use parser::{RuleError, parse_rules};

/// One parsed rule: a branch pattern and the app it deploys to.
#[derive(Debug, Clone)]
pub struct EnvironmentMatcher {
    pub regex: Regex,
    pub app: String,
}

/// Resolve the target app for a branch reference, first match wins.
pub fn match_branch<'a>(rules: &'a [EnvironmentMatcher], branch_ref: &str) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.regex.is_match(branch_ref))
        .map(|rule| rule.app.as_str())
}
