//! HTML rendering for the calculator page

use calculadora_engine::Operation;

use crate::form::{outcome_text, CalculationForm, Outcome};

/// Render the calculator page.
///
/// `form` pre-fills the inputs with the last submission. When `outcome` is
/// present it becomes the page's only `<h2>`.
pub fn render(form: Option<&CalculationForm>, outcome: Option<&Outcome>) -> String {
    let num1 = form.map(|f| escape_html(&f.num1)).unwrap_or_default();
    let num2 = form.map(|f| escape_html(&f.num2)).unwrap_or_default();
    let selected = form.map(|f| f.operacion.trim()).unwrap_or_default();

    let mut options = String::new();
    for op in Operation::ALL {
        let attr = if op.as_str() == selected { " selected" } else { "" };
        options.push_str(&format!(
            "\n          <option value=\"{value}\"{attr}>{label}</option>",
            value = op.as_str(),
            label = escape_html(op.label()),
        ));
    }

    let result = match outcome {
        Some(outcome) => format!(
            "\n    <h2 id=\"resultado\" data-outcome=\"{kind}\">{text}</h2>",
            kind = if outcome.is_ok() { "ok" } else { "error" },
            text = escape_html(&outcome_text(outcome)),
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Calculadora</title>
  <link rel="stylesheet" href="/static/styles.css">
</head>
<body>
  <main class="calculadora">
    <h1>Calculadora</h1>
    <form method="post" action="/">
      <label>Primer número
        <input type="text" name="num1" value="{num1}" autocomplete="off">
      </label>
      <label>Segundo número
        <input type="text" name="num2" value="{num2}" autocomplete="off">
      </label>
      <label>Operación
        <select name="operacion">{options}
        </select>
      </label>
      <button type="submit">Calcular</button>
    </form>{result}
  </main>
</body>
</html>
"#
    )
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
