//! Static file serving

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Static file handler for the embedded page assets
pub struct StaticFiles {}

impl StaticFiles {
    pub fn new() -> Self {
        Self {}
    }

    /// Serve a static file
    pub async fn serve(&self, path: &str) -> Response {
        let content_type = guess_content_type(path);

        match path {
            "styles.css" => serve_embedded(STYLES_CSS, content_type),
            _ => (StatusCode::NOT_FOUND, "File not found").into_response(),
        }
    }
}

impl Default for StaticFiles {
    fn default() -> Self {
        Self::new()
    }
}

fn guess_content_type(path: &str) -> &'static str {
    if path.ends_with(".css") {
        "text/css; charset=utf-8"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".html") {
        "text/html; charset=utf-8"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}

fn serve_embedded(content: &'static str, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        content,
    )
        .into_response()
}

// Red racing theme: bold red button, red left border on the result heading.
const STYLES_CSS: &str = r#"
:root {
  --rojo: #e30b0b;
  --rojo-oscuro: #a10808;
  --amarillo: #ffc20e;
  --fondo: #1b1b1f;
  --texto: #f5f5f5;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  min-height: 100vh;
  display: flex;
  align-items: center;
  justify-content: center;
  background: var(--fondo);
  color: var(--texto);
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
}

.calculadora {
  width: min(420px, 92vw);
  padding: 2rem;
  border-radius: 12px;
  background: #26262c;
  border-top: 6px solid var(--rojo);
  box-shadow: 0 10px 30px rgba(0, 0, 0, 0.4);
}

h1 {
  margin-top: 0;
  color: var(--amarillo);
  letter-spacing: 0.05em;
}

form {
  display: grid;
  gap: 1rem;
}

label {
  display: grid;
  gap: 0.35rem;
  font-size: 0.9rem;
}

input, select {
  padding: 0.6rem 0.75rem;
  border: 1px solid #444;
  border-radius: 6px;
  background: #111;
  color: var(--texto);
  font-size: 1rem;
}

button[type="submit"] {
  padding: 0.75rem;
  border: none;
  border-radius: 6px;
  background: var(--rojo);
  color: #fff;
  font-weight: 700;
  text-transform: uppercase;
  cursor: pointer;
}

button[type="submit"]:hover { background: var(--rojo-oscuro); }

h2 {
  margin: 1.5rem 0 0;
  padding: 0.75rem 1rem;
  border-left: 6px solid var(--rojo);
  background: #111;
  color: var(--rojo);
  font-size: 1.25rem;
}

h2[data-outcome="ok"] { color: var(--amarillo); }
"#;
