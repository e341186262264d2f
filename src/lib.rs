#![allow(clippy::uninlined_format_args)]

//! # pagecheck
//!
//! Declarative page-assertion checker driving one WebDriver browser session.
//!
//! Given a target URL and an ordered list of checks (a locator plus one or
//! more predicates), pagecheck opens a single browser session, navigates
//! once, evaluates every check in order, and produces a report with one
//! pass/fail/error result per check. The session is always released, and
//! the CLI exit code reflects the overall outcome.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Run a suite against a page (requires geckodriver or chromedriver)
//! pagecheck "http://localhost:3000" checks.json
//!
//! # Use Chrome instead of Firefox (default)
//! pagecheck "http://localhost:3000" checks.json --browser chrome
//!
//! # Save a full-page screenshot alongside the run
//! pagecheck "http://localhost:3000" checks.json --screenshot home.png
//!
//! # Human-readable output instead of JSON
//! pagecheck "http://localhost:3000" checks.json --format simple
//! ```
//!
//! A suite is plain JSON with tagged locators and assertions:
//!
//! ```json
//! {
//!   "checks": [
//!     {
//!       "name": "join-visible",
//!       "locator": { "by": "text", "text": "Join Room" },
//!       "assertions": [ { "kind": "visible" } ]
//!     },
//!     {
//!       "name": "create-animates",
//!       "locator": { "by": "text", "text": "Create New Room" },
//!       "assertions": [
//!         { "kind": "attribute_contains", "attribute": "class", "substring": "transition-transform" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Exit codes: 0 all passed, 1 some check failed, 2 the run errored,
//! 3 configuration rejected, 4 suite file unreadable.
//!
//! ## Library Usage
//!
//! ```no_run
//! use pagecheck::{run, Assertion, Check, Locator, RunOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let checks = vec![Check {
//!     name: "heading".to_string(),
//!     locator: Locator::Css { selector: "h1".to_string() },
//!     assertions: vec![Assertion::Visible],
//! }];
//!
//! let report = run("https://example.com", &checks, &RunOptions::default()).await?;
//! assert_eq!(report.results.len(), checks.len());
//! # Ok(())
//! # }
//! ```

/// Error taxonomy and process exit codes
pub mod errors;

/// Check execution against one browser session
pub mod runner;

/// Check, assertion, and report definitions
pub mod types;

/// WebDriver browser session control
pub mod webdriver;

pub use errors::{ConfigError, PagecheckError};
pub use runner::{RunOptions, run};
pub use types::{
    Assertion, Check, CheckResult, CheckSuite, ElementState, Locator, Outcome, OutputFormat,
    RunReport, ViewportSize,
};
pub use webdriver::{Browser, BrowserType};
