use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// How to find one element on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "lowercase")]
pub enum Locator {
    /// CSS selector
    Css { selector: String },
    /// Substring of the element's visible text
    Text { text: String },
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css { selector } => write!(f, "css={}", selector),
            Locator::Text { text } => write!(f, "text={}", text),
        }
    }
}

/// A single predicate evaluated against a resolved element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assertion {
    /// Element is rendered and visible
    Visible,
    /// Named attribute exists and contains the given substring
    AttributeContains { attribute: String, substring: String },
    /// Element text (trimmed) equals the expected string
    TextEquals { expected: String },
    /// A check that depends on a transient UI state (e.g. a loading
    /// spinner). Not deterministically observable, so suites containing
    /// one are rejected up front instead of polled or retried.
    Transient { description: String },
}

impl Assertion {
    pub fn is_transient(&self) -> bool {
        matches!(self, Assertion::Transient { .. })
    }

    /// Evaluate this predicate against an element snapshot.
    /// Returns the failure message when the predicate does not hold.
    pub fn evaluate(&self, state: &ElementState) -> std::result::Result<(), String> {
        match self {
            Assertion::Visible => {
                if state.displayed {
                    Ok(())
                } else {
                    Err("element is not visible".to_string())
                }
            }
            Assertion::AttributeContains {
                attribute,
                substring,
            } => match state.attributes.get(attribute).and_then(|v| v.as_deref()) {
                Some(value) if value.contains(substring.as_str()) => Ok(()),
                Some(value) => Err(format!(
                    "attribute '{}' is missing '{}' (was '{}')",
                    attribute, substring, value
                )),
                None => Err(format!("attribute '{}' is not present", attribute)),
            },
            Assertion::TextEquals { expected } => {
                let actual = state.text.trim();
                if actual == expected {
                    Ok(())
                } else {
                    Err(format!("text was '{}', expected '{}'", actual, expected))
                }
            }
            Assertion::Transient { description } => Err(format!(
                "transient state '{}' is not deterministically checkable",
                description
            )),
        }
    }
}

/// Snapshot of the element state assertions are evaluated against
#[derive(Debug, Clone, Default)]
pub struct ElementState {
    /// Whether the element is displayed
    pub displayed: bool,
    /// The element's visible text
    pub text: String,
    /// Requested attributes; value is None when the attribute is absent
    pub attributes: HashMap<String, Option<String>>,
}

/// One declarative assertion unit: a locator plus one or more predicates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Identifier used in results and logs
    pub name: String,
    /// How to find the element under test
    pub locator: Locator,
    /// Predicates evaluated in order; the first failure wins
    pub assertions: Vec<Assertion>,
}

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Errored,
}

/// Result of executing one check, created once and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check this result belongs to
    pub name: String,
    /// Pass/fail/error outcome
    pub outcome: Outcome,
    /// Human-readable detail messages
    pub messages: Vec<String>,
}

impl CheckResult {
    pub fn passed(name: &str) -> Self {
        CheckResult {
            name: name.to_string(),
            outcome: Outcome::Passed,
            messages: Vec::new(),
        }
    }

    pub fn failed(name: &str, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.to_string(),
            outcome: Outcome::Failed,
            messages: vec![message.into()],
        }
    }

    pub fn errored(name: &str, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.to_string(),
            outcome: Outcome::Errored,
            messages: vec![message.into()],
        }
    }

    /// Result for a check that was never attempted because an earlier
    /// session error aborted the run.
    pub fn not_run(name: &str) -> Self {
        Self::errored(name, "not run: prior error")
    }
}

/// Aggregate result of executing all checks in one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// One result per supplied check, in declaration order
    pub results: Vec<CheckResult>,
}

impl RunReport {
    /// Overall outcome: Passed iff every check passed; Errored if any
    /// check errored; Failed otherwise.
    pub fn overall(&self) -> Outcome {
        if self.results.iter().any(|r| r.outcome == Outcome::Errored) {
            Outcome::Errored
        } else if self.results.iter().any(|r| r.outcome == Outcome::Failed) {
            Outcome::Failed
        } else {
            Outcome::Passed
        }
    }

    /// Counts of (passed, failed, errored) results
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut passed = 0;
        let mut failed = 0;
        let mut errored = 0;
        for result in &self.results {
            match result.outcome {
                Outcome::Passed => passed += 1,
                Outcome::Failed => failed += 1,
                Outcome::Errored => errored += 1,
            }
        }
        (passed, failed, errored)
    }

    /// Process exit code reflecting the overall outcome
    pub fn exit_code(&self) -> i32 {
        match self.overall() {
            Outcome::Passed => 0,
            Outcome::Failed => 1,
            Outcome::Errored => 2,
        }
    }
}

/// A file-loadable list of checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSuite {
    /// Checks executed in declaration order
    pub checks: Vec<Check>,
}

impl CheckSuite {
    /// Parse a suite from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let suite = serde_json::from_str(json)?;
        Ok(suite)
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1920x1080)");
        }

        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
