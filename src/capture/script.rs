//! Playwright integration for headless style capture.
//!
//! This module contains the inline Playwright script, error mapping, and
//! availability checks for Node.js and Playwright.

use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::{Result, SpcError};

/// Playwright script that loads a page, dismisses the usual popups, and
/// harvests computed styles for every target element.
pub(crate) const PAGE_STYLES_SCRIPT: &str = r#"
const [, url, selectorList, navTimeout, idleTimeout, headlessFlag] = process.argv;

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: headlessFlag !== '0' });
    const page = await browser.newPage();
    await page.goto(url, { waitUntil: 'networkidle', timeout: parseInt(navTimeout, 10) });
    await page.waitForLoadState('networkidle', { timeout: parseInt(idleTimeout, 10) });

    // Close the most typical cookie/consent/close pop-ups before reading styles.
    const popupSelectors = [
      '[id*="cookie"] button', '[class*="cookie"] button', '[aria-label*="cookie"]',
      '[id*="consent"] button', '[class*="consent"] button', '[aria-label*="consent"]',
      '[id*="close"]', '[class*="close"]', '[aria-label*="close"]'
    ];
    for (const selector of popupSelectors) {
      try {
        const handle = await page.$(selector);
        if (handle) {
          await handle.click({ timeout: 1000 });
        }
      } catch (err) {
        // Pop-up dismissal never fails the capture.
      }
    }

    const targets = selectorList
      ? await Promise.all(selectorList.split(',').map((s) => page.$(s.trim())))
      : await page.$$('*');

    const elements = [];
    for (const handle of targets) {
      if (!handle) continue;
      try {
        const element = await handle.evaluate((el) => {
          const style = window.getComputedStyle(el);
          return {
            tag: el.tagName,
            selector: el.outerHTML.slice(0, 100),
            color: style.color || null,
            background: style.backgroundColor || null,
            fontSize: style.fontSize || null,
            fontFamily: style.fontFamily || null,
            margin: style.margin || null,
            padding: style.padding || null
          };
        });
        elements.push(element);
      } catch (err) {
        // Element detached mid-walk; skip it.
      }
    }

    console.log(JSON.stringify({ status: 'ok', elements }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Script to check if Playwright is installed.
const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Error result from the capture script.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

/// Maps a spawn error to an appropriate SpcError.
pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> SpcError {
    if err.kind() == io::ErrorKind::NotFound {
        SpcError::Browser(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        SpcError::Io(err)
    }
}

/// Maps Playwright stderr output to an appropriate SpcError.
pub(crate) fn map_capture_error(status_text: impl Into<String>, stderr: &str) -> SpcError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr) {
        return map_capture_status_error(&error.status, error.message);
    }

    let lower = stderr.to_ascii_lowercase();

    if lower.contains("cannot find module 'playwright'") {
        return SpcError::Browser(
            "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
        );
    }

    if lower.contains("timeout") {
        return SpcError::Browser(
            "Playwright timed out; increase the capture timeouts and ensure the page finishes loading."
                .to_string(),
        );
    }

    SpcError::Browser(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

/// Maps a Playwright status error to an appropriate SpcError.
pub(crate) fn map_capture_status_error(status: &str, message: String) -> SpcError {
    if message
        .to_ascii_lowercase()
        .contains("cannot find module 'playwright'")
    {
        SpcError::Browser(
            "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
        )
    } else {
        SpcError::Browser(format!("Playwright error (status {}): {}", status, message))
    }
}

/// Ensures Node.js is available on the system.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            SpcError::Browser(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(SpcError::Browser(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures the Playwright npm package is installed.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            SpcError::Browser(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_capture_error(format!("{:?}", output.status), &stderr));
    }

    Ok(())
}
