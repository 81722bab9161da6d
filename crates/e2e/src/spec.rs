//! Declarative YAML test specification

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{E2eError, E2eResult};

/// A complete test specification parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSpec {
    /// Unique name for this test
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering tests
    #[serde(default)]
    pub tags: Vec<String>,

    /// Viewport size for the browser
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,

    /// Parameter table; each case runs the steps once with its variables
    #[serde(default)]
    pub cases: Vec<TestCase>,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

fn default_viewport() -> Viewport {
    Viewport { width: 1280, height: 720 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// One row of a spec's parameter table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

/// A single step in a test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL (relative to base)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Click an element
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
        #[serde(default)]
        clear_first: bool,
    },

    /// Type text with keyboard simulation
    Type {
        selector: String,
        text: String,
        #[serde(default)]
        delay_ms: Option<u64>,
    },

    /// Press a key
    Press {
        selector: Option<String>,
        key: String,
    },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep {
        ms: u64,
    },

    /// Assert something about an element
    Assert {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        text_contains: Option<String>,
        #[serde(default)]
        attribute: Option<AttributeAssertion>,
        #[serde(default)]
        count: Option<usize>,
    },

    /// Take a screenshot
    Screenshot {
        name: String,
        #[serde(default)]
        selector: Option<String>,
        #[serde(default)]
        full_page: bool,
    },

    /// Hover over an element
    Hover {
        selector: String,
    },

    /// Focus an element
    Focus {
        selector: String,
    },

    /// Select an option from a dropdown by value
    Select {
        selector: String,
        value: String,
    },

    /// Check a checkbox
    Check {
        selector: String,
    },

    /// Uncheck a checkbox
    Uncheck {
        selector: String,
    },

    /// Log a message (for debugging)
    Log {
        message: String,
    },
}

/// Result headings can take a moment after a full form post.
fn default_wait_timeout() -> u64 {
    10_000
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeAssertion {
    pub name: String,
    pub value: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

impl TestSpec {
    /// Parse a test spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        if spec.steps.is_empty() {
            return Err(E2eError::SpecParse(format!("spec '{}' has no steps", spec.name)));
        }
        Ok(spec)
    }

    /// Parse a test spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            E2eError::Yaml(inner) => {
                E2eError::SpecParse(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }

    /// Load all test specs from a directory, expanded per case, in path order
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut paths: Vec<_> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .collect();
        paths.sort();

        let mut specs = Vec::new();
        for path in paths {
            specs.extend(Self::from_file(&path)?.expand()?);
        }

        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.has_tag(tag)).collect()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Expand the parameter table into one concrete spec per case.
    ///
    /// A spec without cases expands to itself. Each case's spec is named
    /// `<name>[<case>]` and has every `${var}` in its steps replaced.
    pub fn expand(&self) -> E2eResult<Vec<Self>> {
        if self.cases.is_empty() {
            return Ok(vec![self.clone()]);
        }

        self.cases
            .iter()
            .map(|case| {
                let steps = self
                    .steps
                    .iter()
                    .map(|step| substitute_step(step, case))
                    .collect::<E2eResult<Vec<_>>>()?;

                Ok(TestSpec {
                    name: format!("{}[{}]", self.name, case.name),
                    cases: Vec::new(),
                    steps,
                    ..self.clone()
                })
            })
            .collect()
    }
}

fn substitute_step(step: &TestStep, case: &TestCase) -> E2eResult<TestStep> {
    let mut value = serde_json::to_value(step)?;
    substitute_value(&mut value, case)?;
    Ok(serde_json::from_value(value)?)
}

fn substitute_value(value: &mut serde_json::Value, case: &TestCase) -> E2eResult<()> {
    match value {
        serde_json::Value::String(s) => *s = substitute_str(s, case)?,
        serde_json::Value::Array(items) => {
            for item in items {
                substitute_value(item, case)?;
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values_mut() {
                substitute_value(item, case)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Replace `${var}` placeholders with the case's values
fn substitute_str(input: &str, case: &TestCase) -> E2eResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            E2eError::SpecParse(format!("unterminated placeholder in '{}'", input))
        })?;
        let name = &after[..end];
        let replacement = case.vars.get(name).ok_or_else(|| E2eError::UnboundVariable {
            name: name.to_string(),
            case: case.name.clone(),
        })?;
        out.push_str(replacement);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
