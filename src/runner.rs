use anyhow::Result;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::errors::ConfigError;
use crate::types::{Check, CheckResult, ElementState, RunReport, ViewportSize};
use crate::webdriver::{Browser, BrowserType};

/// Options controlling one checker run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Browser to drive
    pub browser: BrowserType,
    /// WebDriver endpoint override; None uses the browser's standard port
    pub webdriver_url: Option<String>,
    /// Optional viewport dimensions
    pub viewport: Option<ViewportSize>,
    /// Whether to run the browser headless
    pub headless: bool,
    /// Bounded wait for element resolution
    pub element_timeout: Duration,
    /// Optional path for a full-page screenshot taken after navigation.
    /// A side artifact, decoupled from assertion outcomes.
    pub screenshot: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            browser: BrowserType::Firefox,
            webdriver_url: None,
            viewport: None,
            headless: true,
            element_timeout: Duration::from_secs(5),
            screenshot: None,
        }
    }
}

/// Execute `checks` against `target_url` in one browser session.
///
/// Checks run strictly in declaration order, one pass each, no retries.
/// Every supplied check gets exactly one result: a locator miss is Failed,
/// a false predicate is Failed, and a WebDriver-level failure marks the
/// check Errored and aborts the rest as "not run: prior error". The
/// session is released on every exit path after acquisition.
///
/// Only configuration problems (malformed URL, empty or unsupported
/// suite) fail the call itself; they are rejected before any session is
/// opened.
pub async fn run(
    target_url: &str,
    checks: &[Check],
    options: &RunOptions,
) -> Result<RunReport, ConfigError> {
    validate(target_url, checks)?;

    info!("Running {} check(s) against {}", checks.len(), target_url);

    let browser = match Browser::new(
        options.browser,
        options.webdriver_url.as_deref(),
        options.viewport.clone(),
        options.headless,
    )
    .await
    {
        Ok(browser) => {
            info!("Session open ({:?})", browser.browser_type());
            browser
        }
        Err(e) => {
            warn!("Could not open browser session: {:#}", e);
            return Ok(session_failure_report(checks, &format!("{:#}", e)));
        }
    };

    let report = drive(&browser, target_url, checks, options).await;

    // Session is owned by this call; release it exactly once.
    if let Err(e) = browser.close().await {
        warn!("Failed to close browser session: {:#}", e);
    }

    let (passed, failed, errored) = report.counts();
    info!(
        "Run finished: {} passed, {} failed, {} errored",
        passed, failed, errored
    );

    Ok(report)
}

/// Navigate and evaluate checks against an open session.
async fn drive(
    browser: &Browser,
    target_url: &str,
    checks: &[Check],
    options: &RunOptions,
) -> RunReport {
    if let Err(e) = browser.goto(target_url).await {
        warn!("Navigation to {} failed: {:#}", target_url, e);
        return session_failure_report(checks, &format!("navigation failed: {:#}", e));
    }

    if let Some(path) = &options.screenshot {
        // Screenshot is a side artifact; failure never affects outcomes.
        if let Err(e) = browser.screenshot(path).await {
            warn!("Screenshot failed: {:#}", e);
        }
    }

    collect_results(checks, |check| {
        evaluate_check(browser, check, options.element_timeout)
    })
    .await
}

/// Run the evaluator over every check in order. An evaluator error marks
/// that check Errored and aborts the rest as "not run: prior error", so
/// every supplied check still gets exactly one result.
async fn collect_results<'a, F, Fut>(checks: &'a [Check], mut evaluate: F) -> RunReport
where
    F: FnMut(&'a Check) -> Fut,
    Fut: Future<Output = Result<CheckResult>>,
{
    let mut results = Vec::with_capacity(checks.len());
    let mut aborted = false;

    for check in checks {
        if aborted {
            results.push(CheckResult::not_run(&check.name));
            continue;
        }

        match evaluate(check).await {
            Ok(result) => {
                info!("Check '{}': {:?}", check.name, result.outcome);
                results.push(result);
            }
            Err(e) => {
                warn!("Check '{}' hit a session error: {:#}", check.name, e);
                results.push(CheckResult::errored(
                    &check.name,
                    format!("session error: {:#}", e),
                ));
                aborted = true;
            }
        }
    }

    RunReport { results }
}

/// Resolve one check's locator and evaluate its assertions.
/// Errors here are session-level; assertion mismatches are Failed results.
async fn evaluate_check(
    browser: &Browser,
    check: &Check,
    timeout: Duration,
) -> Result<CheckResult> {
    let attributes = referenced_attributes(check);

    match browser.resolve(&check.locator, &attributes, timeout).await? {
        Some(state) => Ok(evaluate_state(check, &state)),
        None => Ok(CheckResult::failed(&check.name, "element not found")),
    }
}

/// Evaluate a check's predicates against a resolved element snapshot.
/// The first failing predicate decides the outcome.
pub(crate) fn evaluate_state(check: &Check, state: &ElementState) -> CheckResult {
    for assertion in &check.assertions {
        if let Err(message) = assertion.evaluate(state) {
            return CheckResult::failed(&check.name, message);
        }
    }
    CheckResult::passed(&check.name)
}

/// Attribute names a check's assertions read, so the session can snapshot
/// exactly those.
fn referenced_attributes(check: &Check) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for assertion in &check.assertions {
        if let crate::types::Assertion::AttributeContains { attribute, .. } = assertion {
            if !names.contains(attribute) {
                names.push(attribute.clone());
            }
        }
    }
    names
}

/// Report for a run where the session never became usable: every check is
/// recorded as not run, with the session error attached to the first.
pub(crate) fn session_failure_report(checks: &[Check], error: &str) -> RunReport {
    let mut results: Vec<CheckResult> = checks
        .iter()
        .map(|check| CheckResult::not_run(&check.name))
        .collect();
    if let Some(first) = results.first_mut() {
        first.messages.push(format!("session error: {}", error));
    }
    RunReport { results }
}

/// Reject bad input before any session resource is acquired.
pub(crate) fn validate(target_url: &str, checks: &[Check]) -> Result<(), ConfigError> {
    let parsed = Url::parse(target_url).map_err(|e| ConfigError::InvalidUrl {
        url: target_url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: target_url.to_string(),
            reason: format!("scheme '{}' is not http or https", parsed.scheme()),
        });
    }

    if checks.is_empty() {
        return Err(ConfigError::NoChecks);
    }

    for check in checks {
        if check.assertions.is_empty() {
            return Err(ConfigError::EmptyCheck(check.name.clone()));
        }
        for assertion in &check.assertions {
            if let crate::types::Assertion::Transient { description } = assertion {
                return Err(ConfigError::TransientAssertion {
                    name: check.name.clone(),
                    description: description.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;
