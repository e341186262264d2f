use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use serde_json::json;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::types::{ElementState, Locator, ViewportSize};

/// Interval between element resolution attempts
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Browser session for WebDriver automation
pub struct Browser {
    client: Client,
    browser_type: BrowserType,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Default WebDriver endpoint for this browser type
    pub fn default_webdriver_url(&self) -> String {
        match self {
            BrowserType::Firefox => "http://localhost:4444".to_string(),
            BrowserType::Chrome => "http://localhost:9515".to_string(),
        }
    }

    fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

impl Browser {
    /// Connect a new browser session through a running WebDriver server.
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `webdriver_url` - WebDriver endpoint, or None for the browser's standard port
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn new(
        browser_type: BrowserType,
        webdriver_url: Option<&str>,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        let webdriver_url = webdriver_url
            .map(str::to_string)
            .unwrap_or_else(|| browser_type.default_webdriver_url());

        if !Self::is_webdriver_running(&webdriver_url).await {
            let driver_name = browser_type.driver_name();
            anyhow::bail!(
                "Cannot connect to {} WebDriver at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name,
                webdriver_url,
                driver_name
            );
        }

        let mut caps = serde_json::Map::new();

        match &browser_type {
            BrowserType::Firefox => {
                let mut firefox_opts = serde_json::Map::new();
                let mut args = Vec::new();

                if headless {
                    args.push("--headless".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }

                firefox_opts.insert("args".to_string(), json!(args));
                caps.insert("moz:firefoxOptions".to_string(), json!(firefox_opts));
            }
            BrowserType::Chrome => {
                let mut chrome_opts = serde_json::Map::new();
                let mut args = vec!["--no-sandbox".to_string()];

                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }

                chrome_opts.insert("args".to_string(), json!(args));
                caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);

        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        // Set viewport size after connection if specified
        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                // Viewport setting is best-effort
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(Browser {
            client,
            browser_type,
        })
    }

    /// Which browser this session drives
    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    async fn is_webdriver_running(url: &str) -> bool {
        // Try to connect to the WebDriver status endpoint
        let status_url = format!("{}/status", url);

        match reqwest::get(&status_url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Navigate to a URL and wait for the document to be ready
    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);

        self.client.goto(url).await?;

        // Wait for the page to be ready to avoid stale element references
        let wait_script = r#"
            return document.readyState === 'complete';
        "#;

        // Max 2 seconds
        for _ in 0..20 {
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => {
                    break;
                }
                _ => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        Ok(())
    }

    /// Resolve a locator against the current page with a bounded wait.
    ///
    /// Polls until a matching element appears or the timeout elapses.
    /// Returns None when nothing matched within the timeout; the snapshot
    /// includes every attribute named in `attributes`. WebDriver-level
    /// failures propagate as errors.
    pub async fn resolve(
        &self,
        locator: &Locator,
        attributes: &[String],
        timeout: Duration,
    ) -> Result<Option<ElementState>> {
        debug!("Resolving locator: {}", locator);

        let deadline = Instant::now() + timeout;

        loop {
            let elements = match locator {
                Locator::Css { selector } => {
                    self.client.find_all(WdLocator::Css(selector)).await?
                }
                Locator::Text { text } => {
                    let xpath = text_xpath(text);
                    self.client.find_all(WdLocator::XPath(&xpath)).await?
                }
            };

            if let Some(element) = elements.first() {
                let displayed = element.is_displayed().await?;
                let text = element.text().await.unwrap_or_default();

                let mut attrs = std::collections::HashMap::new();
                for name in attributes {
                    let value = element.attr(name).await?;
                    attrs.insert(name.clone(), value);
                }

                debug!("Locator {} resolved ({} matches)", locator, elements.len());
                return Ok(Some(ElementState {
                    displayed,
                    text,
                    attributes: attrs,
                }));
            }

            if Instant::now() >= deadline {
                debug!("Locator {} did not resolve within {:?}", locator, timeout);
                return Ok(None);
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Capture a full-page screenshot and write it to `path`.
    /// Returns the number of bytes written.
    pub async fn screenshot(&self, path: &Path) -> Result<usize> {
        let png = self
            .client
            .screenshot()
            .await
            .context("Failed to capture screenshot")?;
        let bytes = png.len();
        tokio::fs::write(path, png)
            .await
            .with_context(|| format!("Failed to write screenshot to {}", path.display()))?;
        info!("Screenshot saved to {} ({} bytes)", path.display(), bytes);
        Ok(bytes)
    }

    /// Close the session. Consumes the browser so it can only happen once.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

/// XPath matching the deepest elements whose visible text contains `text`,
/// mirroring how users read a page rather than how the DOM nests it.
fn text_xpath(text: &str) -> String {
    let literal = xpath_string_literal(text);
    format!(
        "//*[contains(normalize-space(.), {lit}) and not(.//*[contains(normalize-space(.), {lit})])]",
        lit = literal
    )
}

/// Quote a string for embedding in an XPath expression. XPath 1.0 has no
/// escape sequences, so strings containing both quote kinds need concat().
fn xpath_string_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{}'", s)
    } else if !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        let parts: Vec<String> = s
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod webdriver_test;
