//! Named-input sources for CI invocations.

use std::collections::HashMap;

/// A source of named CI inputs.
///
/// Both the real Actions environment and the in-memory test source hide
/// behind this trait so argument resolution never touches `std::env`
/// directly.
pub trait InputSource {
    /// Look up an input by its declared name.
    ///
    /// Returns `None` for unset or empty values; whitespace is trimmed.
    fn input(&self, name: &str) -> Option<String>;
}

/// Reads inputs the way the GitHub Actions runner exposes them: the input
/// name uppercased, spaces replaced with underscores, prefixed with
/// `INPUT_`.
#[derive(Debug, Default)]
pub struct ActionInputs;

impl ActionInputs {
    /// Environment variable name for a given input.
    pub fn env_key(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for ActionInputs {
    fn input(&self, name: &str) -> Option<String> {
        let value = std::env::var(Self::env_key(name)).ok()?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// In-memory input source for tests.
#[derive(Debug, Default)]
pub struct StaticInputs(HashMap<String, String>);

impl<const N: usize> From<[(&str, &str); N]> for StaticInputs {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl InputSource for StaticInputs {
    fn input(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
