// Test utilities for WebDriver-backed integration tests

use axum::{Router, response::Html, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

use pagecheck::BrowserType;

// Global test lock to prevent concurrent WebDriver sessions
lazy_static::lazy_static! {
    pub static ref WEBDRIVER_LOCK: Arc<Mutex<()>> = Arc::new(Mutex::new(()));
}

/// Serve a static HTML page on an ephemeral local port.
/// The server lives until the test process exits.
pub async fn serve_page(html: &str) -> String {
    let html = html.to_string();
    let app = Router::new().route(
        "/",
        get(move || {
            let html = html.clone();
            async move { Html(html) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Find a WebDriver server we can actually reach, preferring Firefox.
/// Returns None when neither geckodriver nor chromedriver is up, so
/// callers can skip instead of failing.
pub async fn available_browser() -> Option<BrowserType> {
    for browser in [BrowserType::Firefox, BrowserType::Chrome] {
        let status_url = format!("{}/status", browser.default_webdriver_url());
        if let Ok(response) = reqwest::get(&status_url).await {
            if response.status().is_success() {
                return Some(browser);
            }
        }
    }
    eprintln!("WARNING: No WebDriver server reachable; skipping browser-backed test");
    None
}
