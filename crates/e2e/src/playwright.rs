//! Playwright browser automation
//!
//! A spec's steps are compiled into one Node script so the browser session
//! (and the submitted form) survives from step to step. The script reports
//! each completed step on stdout as a `__E2E__ {json}` line, which is how
//! per-step results come back to Rust.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::spec::{AttributeAssertion, TestStep};

/// Prefix of the progress lines emitted by generated scripts
const REPORT_PREFIX: &str = "__E2E__ ";

/// Playwright browser handle
pub struct PlaywrightHandle {
    /// Base URL of the server
    base_url: String,

    /// Directory for screenshots
    screenshot_dir: PathBuf,

    /// Viewport dimensions
    viewport_width: u32,
    viewport_height: u32,

    /// Browser type
    browser: Browser,

    headless: bool,

    /// Extra module search path for `require('playwright')`
    node_path: Option<PathBuf>,

    /// Upper bound for one spec's script
    script_timeout: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Result of executing a test step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot_path: Option<PathBuf>,
}

/// One progress line reported by a generated script
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct StepReport {
    step: usize,
    ok: bool,
    #[serde(default)]
    ms: u64,
    #[serde(default)]
    error: Option<String>,
}

impl PlaywrightHandle {
    /// Create a new Playwright handle
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;
        Self::unchecked(config)
    }

    /// Create a handle without probing for the Playwright CLI
    pub fn unchecked(config: PlaywrightConfig) -> E2eResult<Self> {
        std::fs::create_dir_all(&config.screenshot_dir)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            screenshot_dir: config.screenshot_dir,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            browser: config.browser,
            headless: config.headless,
            node_path: config.node_path,
            script_timeout: config.script_timeout,
        })
    }

    /// Check if Playwright is installed
    pub fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Run all steps in one browser session.
    ///
    /// Returns one result per step that ran; execution stops at the first
    /// failing step, which is the last entry.
    pub async fn execute_steps(&self, steps: &[TestStep]) -> E2eResult<Vec<StepResult>> {
        let script = self.build_script(steps);
        let (success, stdout, stderr) = self.run_script(&script).await?;
        let reports = parse_reports(&stdout);

        self.collect_results(steps, reports, success).map_err(|e| match e {
            E2eError::Playwright(msg) => E2eError::Playwright(format!(
                "{}\nstdout: {}\nstderr: {}",
                msg, stdout, stderr
            )),
            other => other,
        })
    }

    /// Map a script's step reports onto the steps it was built from.
    ///
    /// A clean exit must account for every step; a failed exit must carry a
    /// failing report.
    fn collect_results(
        &self,
        steps: &[TestStep],
        reports: Vec<StepReport>,
        success: bool,
    ) -> E2eResult<Vec<StepResult>> {
        let mut results = Vec::with_capacity(reports.len());
        for report in reports {
            let Some(step) = steps.get(report.step) else {
                warn!("Ignoring report for unknown step {}", report.step);
                continue;
            };
            let screenshot_path = match step {
                TestStep::Screenshot { name, .. } if report.ok => Some(self.screenshot_path(name)),
                _ => None,
            };
            results.push(StepResult {
                success: report.ok,
                step_name: step_name(step),
                duration_ms: report.ms,
                error: report.error,
                screenshot_path,
            });
        }

        let failed = results.iter().any(|r| !r.success);
        if !success && !failed {
            // The script died outside any step (launch failure, missing module).
            return Err(E2eError::Playwright("Script failed".to_string()));
        }
        if success && !failed && results.len() < steps.len() {
            return Err(E2eError::Playwright(format!(
                "Script exited cleanly after reporting {} of {} steps",
                results.len(),
                steps.len()
            )));
        }

        Ok(results)
    }

    fn screenshot_path(&self, name: &str) -> PathBuf {
        self.screenshot_dir.join(format!("{}.png", name))
    }

    /// Build the Playwright script for a set of steps
    pub fn build_script(&self, steps: &[TestStep]) -> String {
        let mut script = String::new();

        // Header
        script.push_str(&format!(r#"
const {{ chromium, firefox, webkit }} = require('playwright');

const report = (entry) => console.log({prefix} + JSON.stringify(entry));

async function firstText(page, selector) {{
  return (await page.locator(selector).first().innerText()).trim();
}}

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const baseUrl = {base_url};
  let step = 0;
  let started = Date.now();

  try {{
"#,
            prefix = js_str(REPORT_PREFIX),
            browser = self.browser.as_str(),
            headless = self.headless,
            width = self.viewport_width,
            height = self.viewport_height,
            base_url = js_str(&self.base_url),
        ));

        // Generate step code
        for (i, step) in steps.iter().enumerate() {
            script.push_str(&format!("\n    // Step {}: {}\n", i + 1, step_name(step)));
            script.push_str(&format!("    step = {}; started = Date.now();\n", i));
            script.push_str(&self.step_to_js(step));
            script.push_str(&format!(
                "\n    report({{ step: {}, ok: true, ms: Date.now() - started }});\n",
                i
            ));
        }

        // Footer
        script.push_str(r#"
  } catch (error) {
    report({ step, ok: false, ms: Date.now() - started, error: error.message });
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})().catch((error) => {
  console.error(error);
  process.exit(2);
});
"#);

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &TestStep) -> String {
        match step {
            TestStep::Navigate { url, wait_for_selector } => {
                let wait = wait_for_selector.as_ref()
                    .map(|s| format!("\n    await page.waitForSelector({});", js_str(s)))
                    .unwrap_or_default();
                format!("    await page.goto(baseUrl + {});{}", js_str(url), wait)
            }
            TestStep::Click { selector, timeout_ms } => {
                let timeout = timeout_ms.unwrap_or(5000);
                format!("    await page.click({}, {{ timeout: {} }});", js_str(selector), timeout)
            }
            TestStep::Fill { selector, value, clear_first } => {
                if *clear_first {
                    format!("    await page.fill({sel}, '');\n    await page.fill({sel}, {val});",
                        sel = js_str(selector), val = js_str(value))
                } else {
                    format!("    await page.fill({}, {});", js_str(selector), js_str(value))
                }
            }
            TestStep::Type { selector, text, delay_ms } => {
                let delay = delay_ms.unwrap_or(50);
                format!("    await page.type({}, {}, {{ delay: {} }});", js_str(selector), js_str(text), delay)
            }
            TestStep::Press { selector, key } => {
                match selector {
                    Some(sel) => format!("    await page.locator({}).press({});", js_str(sel), js_str(key)),
                    None => format!("    await page.keyboard.press({});", js_str(key)),
                }
            }
            TestStep::Wait { selector, timeout_ms, state } => {
                format!("    await page.waitForSelector({}, {{ state: '{}', timeout: {} }});",
                    js_str(selector), state.as_str(), timeout_ms)
            }
            TestStep::Sleep { ms } => {
                format!("    await page.waitForTimeout({});", ms)
            }
            TestStep::Assert { selector, visible, text, text_contains, attribute, count } => {
                assert_to_js(selector, *visible, text.as_deref(), text_contains.as_deref(), attribute.as_ref(), *count)
            }
            TestStep::Screenshot { name, selector, full_page } => {
                let path = self.screenshot_path(name);
                let path = js_str(&path.to_string_lossy());

                if let Some(sel) = selector {
                    format!("    await page.locator({}).screenshot({{ path: {} }});", js_str(sel), path)
                } else {
                    format!("    await page.screenshot({{ path: {}, fullPage: {} }});", path, full_page)
                }
            }
            TestStep::Hover { selector } => {
                format!("    await page.hover({});", js_str(selector))
            }
            TestStep::Focus { selector } => {
                format!("    await page.focus({});", js_str(selector))
            }
            TestStep::Select { selector, value } => {
                format!("    await page.selectOption({}, {{ value: {} }});", js_str(selector), js_str(value))
            }
            TestStep::Check { selector } => {
                format!("    await page.check({});", js_str(selector))
            }
            TestStep::Uncheck { selector } => {
                format!("    await page.uncheck({});", js_str(selector))
            }
            TestStep::Log { message } => {
                format!("    console.log('[TEST] ' + {});", js_str(message))
            }
        }
    }

    /// Run a script with node. Returns (exit success, stdout, stderr).
    pub async fn run_script(&self, script: &str) -> E2eResult<(bool, String, String)> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("test.js");
        std::fs::write(&script_path, script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path).kill_on_drop(true);
        if let Some(node_path) = &self.node_path {
            cmd.env("NODE_PATH", node_path);
        }

        let output = tokio::time::timeout(self.script_timeout, cmd.output())
            .await
            .map_err(|_| E2eError::Playwright(format!(
                "script timed out after {}s", self.script_timeout.as_secs()
            )))??;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        for line in stdout.lines().filter(|l| l.starts_with("[TEST]")) {
            info!("{}", line);
        }

        Ok((output.status.success(), stdout, stderr))
    }
}

/// Short human-readable name for a step
pub fn step_name(step: &TestStep) -> String {
    match step {
        TestStep::Navigate { url, .. } => format!("navigate:{}", url),
        TestStep::Click { selector, .. } => format!("click:{}", selector),
        TestStep::Fill { selector, .. } => format!("fill:{}", selector),
        TestStep::Type { selector, .. } => format!("type:{}", selector),
        TestStep::Press { key, .. } => format!("press:{}", key),
        TestStep::Wait { selector, .. } => format!("wait:{}", selector),
        TestStep::Sleep { ms } => format!("sleep:{}ms", ms),
        TestStep::Assert { selector, .. } => format!("assert:{}", selector),
        TestStep::Screenshot { name, .. } => format!("screenshot:{}", name),
        TestStep::Hover { selector } => format!("hover:{}", selector),
        TestStep::Focus { selector } => format!("focus:{}", selector),
        TestStep::Select { selector, .. } => format!("select:{}", selector),
        TestStep::Check { selector } => format!("check:{}", selector),
        TestStep::Uncheck { selector } => format!("uncheck:{}", selector),
        TestStep::Log { message } => {
            format!("log:{}", message.chars().take(30).collect::<String>())
        }
    }
}

fn assert_to_js(
    selector: &str,
    visible: Option<bool>,
    text: Option<&str>,
    text_contains: Option<&str>,
    attribute: Option<&AttributeAssertion>,
    count: Option<usize>,
) -> String {
    let sel = js_str(selector);
    let mut assertions = Vec::new();

    if let Some(vis) = visible {
        let state = if vis { "visible" } else { "hidden" };
        assertions.push(format!(
            "    await page.locator({sel}).first().waitFor({{ state: '{state}', timeout: 5000 }});"));
    }

    if let Some(t) = text {
        assertions.push(format!(
            r#"    {{
      const actual = await firstText(page, {sel});
      if (actual !== {expected}) throw new Error(`expected text ${{JSON.stringify({expected})}}, got ${{JSON.stringify(actual)}}`);
    }}"#,
            expected = js_str(t)));
    }

    if let Some(tc) = text_contains {
        assertions.push(format!(
            r#"    {{
      const actual = await firstText(page, {sel});
      if (!actual.includes({expected})) throw new Error(`expected text containing ${{JSON.stringify({expected})}}, got ${{JSON.stringify(actual)}}`);
    }}"#,
            expected = js_str(tc)));
    }

    if let Some(attr) = attribute {
        let check = match (&attr.value, &attr.contains) {
            (Some(val), _) => format!("actual === {}", js_str(val)),
            (None, Some(part)) => format!("actual !== null && actual.includes({})", js_str(part)),
            (None, None) => "actual !== null".to_string(),
        };
        assertions.push(format!(
            r#"    {{
      const actual = await page.locator({sel}).first().getAttribute({name});
      if (!({check})) throw new Error(`unexpected attribute ${{{name}}}: ${{JSON.stringify(actual)}}`);
    }}"#,
            name = js_str(&attr.name)));
    }

    if let Some(c) = count {
        assertions.push(format!(
            r#"    {{
      const actual = await page.locator({sel}).count();
      if (actual !== {c}) throw new Error(`expected {c} element(s), found ${{actual}}`);
    }}"#));
    }

    assertions.join("\n")
}

/// Encode a string as a JavaScript string literal
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn parse_reports(stdout: &str) -> Vec<StepReport> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix(REPORT_PREFIX))
        .filter_map(|json| match serde_json::from_str(json) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Unparseable step report {:?}: {}", json, e);
                None
            }
        })
        .collect()
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub browser: Browser,
    pub headless: bool,
    pub node_path: Option<PathBuf>,
    pub script_timeout: Duration,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            viewport_width: 1280,
            viewport_height: 720,
            browser: Browser::Chromium,
            headless: true,
            node_path: None,
            script_timeout: Duration::from_secs(120),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::WaitState;

    fn handle() -> (tempfile::TempDir, PlaywrightHandle) {
        let dir = tempfile::tempdir().unwrap();
        let handle = PlaywrightHandle::unchecked(PlaywrightConfig {
            base_url: "http://127.0.0.1:4321/".to_string(),
            screenshot_dir: dir.path().join("shots"),
            ..Default::default()
        })
        .unwrap();
        (dir, handle)
    }

    #[test]
    fn test_js_str_escapes() {
        assert_eq!(js_str("plain"), "\"plain\"");
        assert_eq!(js_str("it's \"x\""), r#""it's \"x\"""#);
        assert_eq!(js_str("a\nb"), r#""a\nb""#);
    }

    #[test]
    fn test_build_script_reports_every_step() {
        let (_dir, handle) = handle();
        let steps = vec![
            TestStep::Navigate { url: "/".to_string(), wait_for_selector: None },
            TestStep::Select {
                selector: "select[name=\"operacion\"]".to_string(),
                value: "dividir".to_string(),
            },
            TestStep::Wait {
                selector: "h2".to_string(),
                timeout_ms: 10_000,
                state: WaitState::Visible,
            },
        ];
        let script = handle.build_script(&steps);

        assert!(script.contains("await chromium.launch({ headless: true })"));
        assert!(script.contains(r#"const baseUrl = "http://127.0.0.1:4321";"#));
        assert!(script.contains(r#"await page.goto(baseUrl + "/");"#));
        assert!(script.contains(r#"page.selectOption("select[name=\"operacion\"]", { value: "dividir" })"#));
        assert!(script.contains(r#"page.waitForSelector("h2", { state: 'visible', timeout: 10000 })"#));
        for i in 0..steps.len() {
            assert!(script.contains(&format!("report({{ step: {}, ok: true", i)));
        }
    }

    #[test]
    fn test_assert_text_contains_js() {
        let js = assert_to_js("h2", Some(true), None, Some("Introduce números válidos"), None, Some(1));
        assert!(js.contains("waitFor({ state: 'visible'"));
        assert!(js.contains(r#"actual.includes("Introduce números válidos")"#));
        assert!(js.contains("if (actual !== 1)"));
    }

    #[test]
    fn test_assert_exact_text_js() {
        let js = assert_to_js("h2", None, Some("Resultado: 5"), None, None, None);
        assert!(js.contains(r#"const actual = await firstText(page, "h2");"#));
        assert!(js.contains(r#"if (actual !== "Resultado: 5")"#));
        assert!(!js.contains("waitFor("));
        assert!(!js.contains(".includes("));
    }

    #[test]
    fn test_assert_attribute_js() {
        let attr = |value: Option<&str>, contains: Option<&str>| AttributeAssertion {
            name: "data-outcome".to_string(),
            value: value.map(str::to_string),
            contains: contains.map(str::to_string),
        };

        let exact = assert_to_js("#resultado", None, None, None, Some(&attr(Some("ok"), Some("o"))), None);
        assert!(exact.contains(r##"page.locator("#resultado").first().getAttribute("data-outcome")"##));
        assert!(exact.contains(r#"if (!(actual === "ok"))"#));

        let partial = assert_to_js("#resultado", None, None, None, Some(&attr(None, Some("err"))), None);
        assert!(partial.contains(r#"if (!(actual !== null && actual.includes("err")))"#));

        let present = assert_to_js("#resultado", None, None, None, Some(&attr(None, None)), None);
        assert!(present.contains("if (!(actual !== null))"));
    }

    fn report(step: usize, ok: bool, error: Option<&str>) -> StepReport {
        StepReport { step, ok, ms: 7, error: error.map(str::to_string) }
    }

    fn form_steps() -> Vec<TestStep> {
        vec![
            TestStep::Navigate { url: "/".to_string(), wait_for_selector: None },
            TestStep::Screenshot { name: "form".to_string(), selector: None, full_page: false },
            TestStep::Click { selector: "button".to_string(), timeout_ms: None },
        ]
    }

    #[test]
    fn test_collect_results_all_steps_pass() {
        let (dir, handle) = handle();
        let reports = vec![report(0, true, None), report(1, true, None), report(2, true, None)];

        let results = handle.collect_results(&form_steps(), reports, true).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(results[0].step_name, "navigate:/");
        assert_eq!(results[0].screenshot_path, None);
        assert_eq!(results[1].screenshot_path, Some(dir.path().join("shots").join("form.png")));
        assert_eq!(results[2].duration_ms, 7);
    }

    #[test]
    fn test_collect_results_failing_screenshot_has_no_path() {
        let (_dir, handle) = handle();
        let reports = vec![report(0, true, None), report(1, false, Some("disk full"))];

        let results = handle.collect_results(&form_steps(), reports, false).unwrap();

        assert_eq!(results.len(), 2);
        assert!(!results[1].success);
        assert_eq!(results[1].error.as_deref(), Some("disk full"));
        assert_eq!(results[1].screenshot_path, None);
    }

    #[test]
    fn test_collect_results_ignores_unknown_step() {
        let (_dir, handle) = handle();
        let reports = vec![
            report(0, true, None),
            report(9, true, None),
            report(1, true, None),
            report(2, true, None),
        ];

        let results = handle.collect_results(&form_steps(), reports, true).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.step_name.as_str()).collect();
        assert_eq!(names, ["navigate:/", "screenshot:form", "click:button"]);
    }

    #[test]
    fn test_collect_results_crash_without_failing_report() {
        let (_dir, handle) = handle();
        let err = handle
            .collect_results(&form_steps(), vec![report(0, true, None)], false)
            .unwrap_err();
        assert!(matches!(err, E2eError::Playwright(_)));
    }

    #[test]
    fn test_collect_results_clean_exit_with_missing_reports() {
        let (_dir, handle) = handle();
        let err = handle
            .collect_results(&form_steps(), vec![report(0, true, None)], true)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Playwright error: Script exited cleanly after reporting 1 of 3 steps"
        );
    }

    #[test]
    fn test_parse_reports() {
        let stdout = "\
[TEST] hola
__E2E__ {\"step\":0,\"ok\":true,\"ms\":12}
noise
__E2E__ {\"step\":1,\"ok\":false,\"ms\":3,\"error\":\"boom\"}
__E2E__ not-json
";
        let reports = parse_reports(stdout);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], StepReport { step: 0, ok: true, ms: 12, error: None });
        assert_eq!(reports[1].error.as_deref(), Some("boom"));
        assert!(!reports[1].ok);
    }

    #[test]
    fn test_step_names() {
        assert_eq!(step_name(&TestStep::Sleep { ms: 5 }), "sleep:5ms");
        let long = TestStep::Log { message: "ñ".repeat(40) };
        assert_eq!(step_name(&long).chars().count(), "log:".len() + 30);
    }

    #[test]
    fn test_screenshot_path_inside_screenshot_dir() {
        let (dir, handle) = handle();
        let js = handle.step_to_js(&TestStep::Screenshot {
            name: "resultado".to_string(),
            selector: None,
            full_page: true,
        });
        assert!(js.contains("resultado.png"));
        assert!(js.contains("fullPage: true"));
        assert!(dir.path().join("shots").is_dir());
    }
}
