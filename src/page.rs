use std::fmt::Write;

use crate::{
    form::FormController,
    schema::{display_label, FieldKind},
    theme::Theme,
    upload::Download,
};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 0; background: #f5f5f5; color: #222; }
        body.dark { background: #121212; color: #eee; }
        .container { max-width: 1100px; margin: 40px auto; padding: 20px; }
        .main-content { display: grid; grid-template-columns: 2fr 1fr; gap: 25px; }
        .form-section, .csv-upload { background: #fff; padding: 25px; border-radius: 10px; }
        body.dark .form-section, body.dark .csv-upload { background: #1e1e1e; }
        .grid-form { display: grid; grid-template-columns: 1fr 1fr; gap: 15px; }
        .full-width { grid-column: 1 / -1; }
        .input-group label { display: block; margin-bottom: 5px; font-weight: bold; }
        input, select { width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 4px; }
        button { background: #007bff; color: white; padding: 12px 24px; border: none; border-radius: 4px; cursor: pointer; }
        button:hover { background: #0056b3; }
        .theme-toggle { float: right; background: #6f42c1; }
        .error { color: #dc3545; font-weight: bold; }
        .result { margin-top: 20px; padding: 20px; border-radius: 5px; background: #d1ecf1; color: #0c5460; }
"#;

/// Escapes text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn render_form(out: &mut String, form: &FormController) {
    let _ = writeln!(out, r#"<form method="post" action="/predict" class="grid-form">"#);

    for (field, value) in form.values().iter() {
        let width = if field.name == "GPA" { " full-width" } else { "" };
        let _ = writeln!(out, r#"<div class="input-group{width}">"#);
        let _ = writeln!(
            out,
            r#"<label for="{0}">{1}</label>"#,
            field.name,
            display_label(field.name)
        );

        match field.kind {
            FieldKind::Choice { options } => {
                let _ = writeln!(out, r#"<select id="{0}" name="{0}" required>"#, field.name);
                let _ = writeln!(out, r#"<option value="">Select</option>"#);
                for (idx, option) in options.iter().enumerate() {
                    let selected = if value == idx.to_string() { " selected" } else { "" };
                    let _ = writeln!(out, r#"<option value="{idx}"{selected}>{option}</option>"#);
                }
                let _ = writeln!(out, "</select>");
            }
            FieldKind::Number { step } => {
                let _ = writeln!(
                    out,
                    r#"<input type="number" step="{step}" id="{0}" name="{0}" value="{1}" required>"#,
                    field.name,
                    escape(value)
                );
            }
        }
        let _ = writeln!(out, "</div>");
    }

    let _ = writeln!(
        out,
        r#"<div class="button-container full-width"><button type="submit">Predict Grade</button></div>"#
    );
    let _ = writeln!(out, "</form>");

    if let Some(error) = form.error() {
        let _ = writeln!(out, r#"<p class="error">{}</p>"#, escape(error));
    }

    if let Some(label) = form.prediction() {
        let _ = writeln!(
            out,
            r#"<div class="result"><h3>Predicted Grade: <span style="color: #007bff">{label}</span></h3></div>"#
        );
    }
}

fn render_upload(out: &mut String, message: Option<&str>, download: Option<&Download>) {
    let _ = writeln!(out, r#"<div class="csv-upload">"#);
    let _ = writeln!(out, "<h2>📁 Upload Student Data (CSV)</h2>");
    let _ = writeln!(
        out,
        r#"<form method="post" action="/predict_csv" enctype="multipart/form-data">"#
    );
    let _ = writeln!(out, r#"<input type="file" name="file" accept=".csv">"#);
    let _ = writeln!(out, r#"<button type="submit">Upload &amp; Predict</button>"#);
    let _ = writeln!(out, "</form>");

    if let Some(message) = message {
        let _ = writeln!(out, "<p>{}</p>", escape(message));
    }

    if let Some(download) = download {
        let _ = writeln!(
            out,
            r#"<a id="result-download" href="{}" download="{}" hidden></a>"#,
            escape(&download.url),
            download.filename
        );
        let _ = writeln!(
            out,
            r#"<script>(function () {{ var link = document.getElementById("result-download"); link.click(); link.remove(); }})();</script>"#
        );
    }

    let _ = writeln!(out, "</div>");
}

/// Whole page: theme toggle, prediction form and CSV batch panel.
pub fn render_page(
    theme: Theme,
    form: &FormController,
    upload_message: Option<&str>,
    download: Option<&Download>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, r#"<meta charset="utf-8">"#);
    let _ = writeln!(out, "<title>EduTrack - Student Performance Predictor</title>");
    let _ = writeln!(out, "<style>{STYLE}</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, r#"<body class="{}">"#, theme.body_class());
    let _ = writeln!(out, r#"<div class="container">"#);
    let _ = writeln!(
        out,
        r#"<form method="post" action="/theme"><button type="submit" class="theme-toggle">{}</button></form>"#,
        theme.toggle_label()
    );
    let _ = writeln!(out, "<h1>🎓 EduTrack - Student Performance Predictor</h1>");
    let _ = writeln!(out, r#"<div class="main-content">"#);

    let _ = writeln!(out, r#"<div class="form-section">"#);
    render_form(&mut out, form);
    let _ = writeln!(out, "</div>");

    let _ = writeln!(out, r#"<div class="csv-section">"#);
    render_upload(&mut out, upload_message, download);
    let _ = writeln!(out, "</div>");

    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");

    out
}
