use super::*;

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read dir").count()
}

#[test]
fn extension_is_reduced_to_safe_characters() {
    assert_eq!(sanitize_extension("webm"), "webm");
    assert_eq!(sanitize_extension("../../ETC"), "etc");
    assert_eq!(sanitize_extension(""), "bin");
    assert_eq!(sanitize_extension("x-mpeg;codecs=opus"), "xmpegcodec");
}

#[tokio::test]
async fn missing_program_fails_and_leaves_no_scratch_files() {
    let root = tempfile::tempdir().expect("root");
    let transcoder = FfmpegTranscoder::new(root.path().join("no-such-ffmpeg"))
        .with_temp_root(root.path());

    let err = transcoder
        .transcode(b"voice bytes", "webm")
        .await
        .expect_err("spawn should fail");
    assert!(matches!(err, TranscodeError::Spawn { .. }));
    assert_eq!(entries(root.path()), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_fails_and_leaves_no_scratch_files() {
    let root = tempfile::tempdir().expect("root");
    let transcoder = FfmpegTranscoder::new("false").with_temp_root(root.path());

    let err = transcoder
        .transcode(b"voice bytes", "webm")
        .await
        .expect_err("transcoder should fail");
    assert!(matches!(err, TranscodeError::Failed { .. }));
    assert_eq!(entries(root.path()), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn success_without_output_file_is_an_error() {
    let root = tempfile::tempdir().expect("root");
    let transcoder = FfmpegTranscoder::new("true").with_temp_root(root.path());

    let err = transcoder
        .transcode(b"voice bytes", "ogg")
        .await
        .expect_err("no output produced");
    assert!(matches!(err, TranscodeError::EmptyOutput));
    assert_eq!(entries(root.path()), 0);
}

#[tokio::test]
async fn missing_temp_root_is_a_scratch_error() {
    let root = tempfile::tempdir().expect("root");
    let transcoder = FfmpegTranscoder::default().with_temp_root(root.path().join("gone"));

    let err = transcoder
        .transcode(b"voice bytes", "webm")
        .await
        .expect_err("scratch dir");
    assert!(matches!(err, TranscodeError::Scratch(_)));
}

#[test]
fn command_requests_low_bitrate_mp3_with_two_threads() {
    let transcoder = FfmpegTranscoder::new("ffmpeg");
    let command = transcoder.command(Path::new("/tmp/in.webm"), Path::new("/tmp/out.mp3"));
    let args: Vec<String> = command
        .as_std()
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    assert_eq!(command.as_std().get_program(), "ffmpeg");
    assert_eq!(
        args,
        [
            "-hide_banner", "-loglevel", "error", "-y", "-threads", "2", "-i", "/tmp/in.webm",
            "-vn", "-c:a", "libmp3lame", "-q:a", "9", "/tmp/out.mp3",
        ]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn successful_run_returns_mp3_and_leaves_no_scratch_files() {
    use std::os::unix::fs::PermissionsExt;

    let bin = tempfile::tempdir().expect("bin dir");
    let script = bin.path().join("fake-ffmpeg");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         while [ \"$#\" -gt 1 ]; do\n\
         \x20 if [ \"$1\" = \"-i\" ]; then input=\"$2\"; fi\n\
         \x20 shift\n\
         done\n\
         { printf 'MP3:'; cat \"$input\"; } > \"$1\"\n",
    )
    .expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).expect("chmod");

    let root = tempfile::tempdir().expect("root");
    let transcoder = FfmpegTranscoder::new(&script).with_temp_root(root.path());

    let audio = transcoder
        .transcode(b"opus-frames", "webm")
        .await
        .expect("transcoded");
    assert_eq!(audio.bytes, b"MP3:opus-frames");
    assert_eq!(audio.content_type, "audio/mpeg");
    assert_eq!(audio.extension, "mp3");
    assert_eq!(entries(root.path()), 0);
}
