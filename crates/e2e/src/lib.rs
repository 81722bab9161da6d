//! Calculadora E2E Test Framework
//!
//! This crate provides a Rust-controlled acceptance testing framework that:
//! - Spawns the web server as a subprocess (or targets `APP_BASE_URL`)
//! - Controls Playwright by generating one Node script per spec
//! - Parses declarative YAML test specs with parameter tables
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── start_server() -> ServerHandle                       │
//! │    ├── PlaywrightHandle::execute_steps() -> [StepResult]    │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML)                                            │
//! │    ├── name, description, tags                              │
//! │    ├── cases: [{ name, vars }]   (expanded per case)        │
//! │    └── steps: [Step]                                        │
//! │          ├── navigate { url }                               │
//! │          ├── fill / type { selector, value }                │
//! │          ├── select { selector, value }                     │
//! │          ├── click { selector }                             │
//! │          ├── wait { selector, timeout_ms, state }           │
//! │          ├── assert { selector, visible?, text?, ... }      │
//! │          └── screenshot { name, selector? }                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod runner;
pub mod spec;
pub mod playwright;
pub mod server;
pub mod error;

pub use runner::TestRunner;
pub use spec::{TestCase, TestSpec, TestStep};
pub use error::{E2eError, E2eResult};
