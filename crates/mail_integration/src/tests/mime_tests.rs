use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::*;

fn sample() -> MimeMessageBuilder {
    MimeMessage::builder()
        .from("site@example.com")
        .to("owner@example.com")
        .subject("New portfolio feedback")
        .part(MimePart::html("<p>hello</p>"))
}

fn disposition_header(raw: &str) -> String {
    let start = raw.find("Content-Disposition:").expect("disposition");
    let rest = &raw[start..];
    let mut end = rest.find("\r\n").expect("line end");
    while rest[end + 2..].starts_with([' ', '\t']) {
        end += 2 + rest[end + 2..].find("\r\n").expect("folded line end");
    }
    rest[..end].to_string()
}

#[test]
fn renders_headers_and_multipart_body() {
    let message = sample()
        .reply_to(Some("visitor@example.com".into()))
        .build()
        .expect("message");
    let raw = message.to_rfc822();

    assert!(raw.contains("From: site@example.com\r\n"));
    assert!(raw.contains("To: owner@example.com\r\n"));
    assert!(raw.contains("Reply-To: visitor@example.com\r\n"));
    assert!(raw.contains("Subject: New portfolio feedback\r\n"));
    assert!(raw.contains("MIME-Version: 1.0\r\n"));
    assert!(raw.contains("multipart/mixed"));
    assert!(raw.contains(&format!("boundary=\"{}\"", message.boundary())));
    assert!(raw.contains("text/html; charset=utf-8"));
    assert!(raw.contains(&STANDARD.encode("<p>hello</p>")));
    assert!(raw.trim_end().ends_with(&format!("--{}--", message.boundary())));
}

#[test]
fn omits_reply_to_when_absent_or_blank() {
    let message = sample().reply_to(Some("  ".into())).build().expect("message");
    assert_eq!(message.header("reply-to"), None);
    assert!(!message.to_rfc822().contains("Reply-To"));
}

#[test]
fn unusable_reply_to_is_dropped_without_injecting_headers() {
    let message = sample()
        .reply_to(Some("evil@example.com\r\nBcc: victim@example.com".into()))
        .build()
        .expect("message");
    assert_eq!(message.header("Reply-To"), None);
    assert!(!message.to_rfc822().contains("Bcc:"));
}

#[test]
fn non_ascii_subject_is_encoded() {
    let message = sample().subject("Retour ✨").build().expect("message");
    assert_eq!(message.header("Subject"), Some("Retour ✨"));

    let raw = message.to_rfc822();
    assert!(raw.is_ascii());
    assert!(raw.to_ascii_lowercase().contains("subject: =?utf-8?"));
}

#[test]
fn attachment_part_carries_disposition_and_wrapped_base64() {
    let audio: Vec<u8> = (0..=255u8).cycle().take(300).collect();
    let message = sample()
        .part(MimePart::attachment("audio/mpeg", "memo.mp3", audio.clone()))
        .build()
        .expect("message");
    let raw = message.to_rfc822();

    assert!(raw.contains("Content-Type: audio/mpeg\r\n"));
    assert_eq!(
        disposition_header(&raw),
        "Content-Disposition: attachment; filename=\"memo.mp3\""
    );

    let encoded = STANDARD.encode(&audio);
    let body_start = raw.find(&encoded[..76]).expect("attachment body");
    let lines: Vec<&str> = raw[body_start..]
        .split("\r\n")
        .take_while(|line| !line.is_empty() && !line.starts_with("--"))
        .collect();
    assert!(lines.iter().all(|line| line.len() <= 76));
    assert_eq!(lines.concat(), encoded);
}

#[test]
fn long_non_ascii_filename_uses_parameter_encoding() {
    let message = sample()
        .part(MimePart::attachment(
            "audio/mpeg",
            "grüße-sprachnachricht-vom-besucher-der-seite.mp3",
            vec![1, 2, 3],
        ))
        .build()
        .expect("message");
    let raw = message.to_rfc822();
    let disposition = disposition_header(&raw);

    assert!(raw.is_ascii());
    assert!(disposition.contains("filename*"));
    assert!(!disposition.contains("=?"));
    assert!(disposition.split("\r\n").all(|line| line.len() <= 78));
}

#[test]
fn boundaries_are_fresh_per_message_and_absent_from_content() {
    let first = sample().build().expect("first");
    let second = sample().build().expect("second");
    assert_ne!(first.boundary(), second.boundary());

    for message in [&first, &second] {
        let raw = message.to_rfc822();
        let marker = format!("--{}\r\n", message.boundary());
        assert_eq!(raw.matches(&marker).count(), message.part_count());
    }
}

#[test]
fn requires_addresses_and_parts() {
    let missing_from = MimeMessage::builder()
        .to("owner@example.com")
        .part(MimePart::html("x"))
        .build();
    assert!(matches!(missing_from, Err(ComposeError::MissingAddress("From"))));

    let missing_to = MimeMessage::builder()
        .from("site@example.com")
        .part(MimePart::html("x"))
        .build();
    assert!(matches!(missing_to, Err(ComposeError::MissingAddress("To"))));

    let no_parts = MimeMessage::builder()
        .from("site@example.com")
        .to("owner@example.com")
        .build();
    assert!(matches!(no_parts, Err(ComposeError::NoParts)));
}

#[test]
fn rejects_malformed_sender_address() {
    let result = MimeMessage::builder()
        .from("not an address")
        .to("owner@example.com")
        .part(MimePart::html("x"))
        .build();
    assert!(matches!(
        result,
        Err(ComposeError::InvalidAddress { field: "From", .. })
    ));
}
