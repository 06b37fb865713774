use std::sync::Arc;

use anyhow::{bail, Context};
use axum::http::HeaderValue;
use form_api::{FormContext, MailSettings};
use mail_integration::{FfmpegTranscoder, HttpRelayTransport, MailTransport, SpoolTransport};
use url::Url;

use crate::config::Settings;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) form: FormContext,
    pub(crate) allowed_origin: HeaderValue,
}

impl AppState {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut transcoder = FfmpegTranscoder::new(&settings.ffmpeg_path);
        if let Some(dir) = &settings.transcode_tmp_dir {
            transcoder = transcoder.with_temp_root(dir);
        }

        let transport: Arc<dyn MailTransport> = match settings.mail_transport.as_str() {
            "relay" => {
                let raw = settings
                    .mail_relay_url
                    .as_deref()
                    .context("MAIL_RELAY_URL is required when MAIL_TRANSPORT=relay")?;
                let endpoint = Url::parse(raw)
                    .with_context(|| format!("invalid mail relay url '{raw}'"))?;
                Arc::new(HttpRelayTransport::new(
                    endpoint,
                    settings.mail_relay_token.clone(),
                ))
            }
            "spool" => Arc::new(SpoolTransport::new(&settings.mail_spool_dir)),
            other => bail!("unknown mail transport '{other}' (expected 'relay' or 'spool')"),
        };

        let allowed_origin = HeaderValue::from_str(&settings.allowed_origin)
            .with_context(|| format!("invalid allowed origin '{}'", settings.allowed_origin))?;

        Ok(Self {
            form: FormContext {
                mail: MailSettings {
                    from: settings.mail_from.clone(),
                    to: settings.mail_to.clone(),
                },
                transcoder: Arc::new(transcoder),
                transport,
            },
            allowed_origin,
        })
    }
}
