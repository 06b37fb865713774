use std::{collections::HashMap, fs, io};

use anyhow::{bail, Context};
use serde::Deserialize;
use toml::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub mail_from: String,
    pub mail_to: Vec<String>,
    pub allowed_origin: String,
    pub ffmpeg_path: String,
    pub transcode_tmp_dir: Option<String>,
    pub mail_transport: String,
    pub mail_relay_url: Option<String>,
    pub mail_relay_token: Option<String>,
    pub mail_spool_dir: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8787".into(),
            mail_from: "portfolio@localhost".into(),
            mail_to: vec!["owner@localhost".into()],
            allowed_origin: "*".into(),
            ffmpeg_path: "ffmpeg".into(),
            transcode_tmp_dir: None,
            mail_transport: "spool".into(),
            mail_relay_url: None,
            mail_relay_token: None,
            mail_spool_dir: "./data/outbox".into(),
            max_body_bytes: 12 * 1024 * 1024,
        }
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let file = match fs::read_to_string("server.toml") {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(err).context("reading server.toml"),
    };
    settings_from(file.as_deref(), |key| std::env::var(key).ok()).context("parsing server.toml")
}

/// Defaults, then `server.toml`, then environment. The first env name in each
/// pair is the short form, the second the `APP__` form; the latter wins.
pub(crate) fn settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg = flatten_table(raw.parse::<toml::Table>()?)?;
        apply(&mut settings, |key| file_cfg.get(key).cloned());
    }

    apply(&mut settings, |key| {
        let upper = key.to_ascii_uppercase();
        env(&format!("APP__{upper}")).or_else(|| env(&upper))
    });

    Ok(settings)
}

/// Scalars become their text form and string arrays a comma list, so file
/// values go through the same parsing as environment values.
fn flatten_table(table: toml::Table) -> anyhow::Result<HashMap<String, String>> {
    table
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Integer(i) => i.to_string(),
                Value::Float(f) => f.to_string(),
                Value::Boolean(b) => b.to_string(),
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        other => bail!("'{key}' must be a list of strings, found {other}"),
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?
                    .join(","),
                other => bail!("unsupported value for '{key}': {}", other.type_str()),
            };
            Ok((key, text))
        })
        .collect()
}

fn apply(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("bind_addr").or_else(|| lookup("server_bind")) {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("mail_from") {
        settings.mail_from = v;
    }
    if let Some(v) = lookup("mail_to") {
        let recipients = split_list(&v);
        if !recipients.is_empty() {
            settings.mail_to = recipients;
        }
    }
    if let Some(v) = lookup("allowed_origin") {
        settings.allowed_origin = v;
    }
    if let Some(v) = lookup("ffmpeg_path") {
        settings.ffmpeg_path = v;
    }
    if let Some(v) = lookup("transcode_tmp_dir") {
        settings.transcode_tmp_dir = Some(v);
    }
    if let Some(v) = lookup("mail_transport") {
        settings.mail_transport = v.trim().to_ascii_lowercase();
    }
    if let Some(v) = lookup("mail_relay_url") {
        settings.mail_relay_url = Some(v);
    }
    if let Some(v) = lookup("mail_relay_token") {
        settings.mail_relay_token = Some(v);
    }
    if let Some(v) = lookup("mail_spool_dir") {
        settings.mail_spool_dir = v;
    }
    if let Some(v) = lookup("max_body_bytes") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.max_body_bytes = parsed;
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
