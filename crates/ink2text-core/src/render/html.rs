//! HTML fragment for browser hosts.

use std::fmt::Write;

use super::ViewState;
use super::pdf::TABLE_HEAD;
use crate::models::extraction::ExtractionResult;
use crate::models::formatting::FormattingPreferences;

/// Render the output panel as an HTML fragment.
pub fn render_html(view: &ViewState<'_>, prefs: &FormattingPreferences) -> String {
    match view {
        ViewState::Loading => placeholder("loading", super::LOADING_MESSAGE),
        ViewState::Failed(message) => placeholder("error", &format!("Error: {message}")),
        ViewState::Empty => placeholder("empty", super::EMPTY_MESSAGE),
        ViewState::Content(result) => content(result, prefs),
    }
}

fn placeholder(class: &str, message: &str) -> String {
    format!(r#"<div class="ink2text-{}"><p>{}</p></div>"#, class, escape(message))
}

fn content(result: &ExtractionResult, prefs: &FormattingPreferences) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="ink2text-output" style="color:{};font-family:{};font-weight:{};font-style:{}">"#,
        prefs.text_color.to_hex(),
        prefs.font_family.css_family(),
        if prefs.bold { "bold" } else { "normal" },
        if prefs.italic { "italic" } else { "normal" },
    );

    if !result.header_text.is_empty() {
        let _ = write!(html, r#"<div class="header">{}</div>"#, paragraph(&result.header_text));
    }

    if !result.items.is_empty() {
        html.push_str(r#"<table class="items" style="width:100%;text-align:left;border-collapse:collapse">"#);
        let _ = write!(
            html,
            r#"<thead><tr style="border-bottom:1px solid #475569"><th style="padding:0.5rem">{}</th><th style="padding:0.5rem;text-align:right">{}</th></tr></thead><tbody>"#,
            escape(TABLE_HEAD[0]),
            escape(TABLE_HEAD[1]),
        );
        for item in &result.items {
            let _ = write!(
                html,
                r#"<tr style="border-bottom:1px solid #334155"><td style="padding:0.5rem">{}</td><td style="padding:0.5rem;text-align:right">{}</td></tr>"#,
                escape(&item.item),
                escape(&item.rate),
            );
        }
        html.push_str("</tbody></table>");
    }

    if !result.footer_text.is_empty() {
        let _ = write!(html, r#"<div class="footer">{}</div>"#, paragraph(&result.footer_text));
    }

    html.push_str("</div>");
    html
}

fn paragraph(text: &str) -> String {
    let lines: Vec<String> = text.split('\n').map(escape).collect();
    format!("<p>{}</p>", lines.join("<br>"))
}

fn escape(text: &str) -> String {
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
