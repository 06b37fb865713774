//! Collaborators the contact form hands work to: the audio transcoder, the
//! mail transport, and the MIME encoding they exchange.

pub mod mime;
pub mod transcoder;
pub mod transport;

pub use mime::{ComposeError, MimeMessage, MimeMessageBuilder, MimePart};
pub use transcoder::{AudioTranscoder, FfmpegTranscoder, TranscodeError, TranscodedAudio};
pub use transport::{
    HttpRelayTransport, MailTransport, OutboundEmail, SpoolTransport, TransportError,
};
