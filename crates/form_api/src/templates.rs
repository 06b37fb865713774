use serde_json::Value;
use shared::{domain::FormType, protocol::SubmitRequest};

pub fn subject_for(form_type: &FormType) -> &'static str {
    match form_type {
        FormType::Feedback => "New portfolio feedback",
        FormType::Message => "New portfolio message",
        FormType::Other(_) => "New portfolio form submission",
    }
}

/// HTML body for the notification email. `voice_filename` is mentioned when
/// a memo rides along as an attachment.
pub fn render_summary(request: &SubmitRequest, voice_filename: Option<&str>) -> String {
    let mut html = match &request.form_type {
        FormType::Feedback => feedback(request),
        FormType::Message => message(request),
        FormType::Other(name) => generic(name, request),
    };
    if let Some(filename) = voice_filename {
        html.push_str(&format!(
            "<p><strong>Voice memo:</strong> attached as {}</p>\n",
            escape(filename)
        ));
    }
    html
}

fn feedback(request: &SubmitRequest) -> String {
    let mut html = String::from("<h2>Portfolio feedback</h2>\n");
    html.push_str(&row("What they liked", &request.like));
    html.push_str(&row("What they disliked", &request.dislike));
    html.push_str(&row("Other thoughts", &request.think));
    html.push_str(&row("Reply to", &request.reply_to));
    html
}

fn message(request: &SubmitRequest) -> String {
    let mut html = String::from("<h2>New message</h2>\n");
    html.push_str(&row("Name", &request.name));
    html.push_str(&row("Email", &request.email));
    html.push_str(&row("Message", &request.msg));
    html
}

fn generic(name: &str, request: &SubmitRequest) -> String {
    let title = if name.is_empty() { "(unnamed)" } else { name };
    let mut html = format!("<h2>Form submission: {}</h2>\n<ul>\n", escape(title));
    let known = request
        .text_fields()
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()));
    let extra = request.extra.iter().map(|(key, value)| {
        let value = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        (key.clone(), value)
    });
    for (key, value) in known.chain(extra) {
        html.push_str(&format!(
            "<li><strong>{}:</strong> {}</li>\n",
            escape(&key),
            multiline(&value)
        ));
    }
    html.push_str("</ul>\n");
    html
}

fn row(label: &str, value: &str) -> String {
    let value = if value.trim().is_empty() {
        "<em>(empty)</em>".to_string()
    } else {
        multiline(value)
    };
    format!("<p><strong>{label}:</strong> {value}</p>\n")
}

fn multiline(value: &str) -> String {
    escape(value).replace("\r\n", "\n").replace('\n', "<br>\n")
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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

#[cfg(test)]
#[path = "tests/templates_tests.rs"]
mod tests;
