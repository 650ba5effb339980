//! Integration tests for scribe CLI.

use clap::Parser;
use scribe::cli::{Cli, run_cli};
use std::path::Path;

const RECOGNITION: &str = r#"{
  "language": "en",
  "segments": [
    {
      "start": 0.0,
      "end": 1.5,
      "text": " Hello world today",
      "words": [
        {"start": 0.0, "end": 0.4, "word": " Hello"},
        {"start": 0.4, "end": 0.9, "word": " world"},
        {"start": 0.9, "end": 1.5, "word": " today"}
      ]
    }
  ]
}"#;

const EXPECTED_SRT: &str = "1
00:00:00,000 --> 00:00:00,900
Hello world

2
00:00:00,900 --> 00:00:01,500
today
";

fn write_recognition(dir: &Path, json: &str) -> String {
    let path = dir.join("talk.asr.json");
    std::fs::write(&path, json).expect("failed to write recognition");
    path.to_str().unwrap().to_string()
}

#[test]
fn cap_regroups_words_and_writes_both_formats() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_recognition(temp_dir.path(), RECOGNITION);
    let out_dir = temp_dir.path().join("out");

    let cli = Cli::parse_from([
        "scribe",
        "cap",
        input.as_str(),
        "--max-words",
        "2",
        "--output-dir",
        out_dir.to_str().unwrap(),
        "--output-name",
        "talk",
    ]);

    run_cli(cli).expect("failed to generate captions");

    let srt = std::fs::read_to_string(out_dir.join("talk.srt")).expect("SRT file not found");
    assert_eq!(srt, EXPECTED_SRT);

    let json = std::fs::read_to_string(out_dir.join("talk.json")).expect("JSON file not found");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "language": "en",
            "segments": [
                {"start": 0.0, "end": 0.9, "text": "Hello world"},
                {"start": 0.9, "end": 1.5, "text": "today"}
            ]
        })
    );
}

#[test]
fn cap_keeps_recognizer_segments_without_max_words() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_recognition(temp_dir.path(), RECOGNITION);

    let cli = Cli::parse_from(["scribe", "cap", input.as_str(), "-f", "srt"]);

    run_cli(cli).expect("failed to generate captions");

    let srt_path = temp_dir.path().join("talk.asr.srt");
    let srt = std::fs::read_to_string(&srt_path).expect("SRT file not found");
    assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,500\nHello world today\n");
}

#[test]
fn cap_writes_empty_artifacts_for_empty_recognition() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_recognition(temp_dir.path(), r#"{"language": null, "segments": []}"#);

    let cli = Cli::parse_from(["scribe", "cap", input.as_str(), "--output-name", "empty"]);

    run_cli(cli).expect("failed to generate captions");

    let srt = std::fs::read_to_string(temp_dir.path().join("empty.srt")).unwrap();
    assert!(srt.is_empty());

    let json = std::fs::read_to_string(temp_dir.path().join("empty.json")).unwrap();
    assert_eq!(json, "{\n  \"language\": null,\n  \"segments\": []\n}");
}

#[test]
fn cap_rejects_zero_max_words() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_recognition(temp_dir.path(), RECOGNITION);

    let cli = Cli::parse_from(["scribe", "cap", input.as_str(), "--max-words", "0"]);

    assert!(run_cli(cli).is_err());
    assert!(!temp_dir.path().join("talk.asr.srt").exists());
}

#[test]
fn cap_rejects_malformed_recognition_without_writing() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_recognition(
        temp_dir.path(),
        r#"{"segments": [{"start": 2.0, "end": 1.0, "text": "backwards"}]}"#,
    );

    let cli = Cli::parse_from(["scribe", "cap", input.as_str(), "--output-name", "talk"]);

    let err = run_cli(cli).unwrap_err();

    assert!(format!("{err:?}").contains("malformed segment at index 0"));
    assert!(!temp_dir.path().join("talk.srt").exists());
    assert!(!temp_dir.path().join("talk.json").exists());
}

#[test]
#[ignore = "ffmpeg required"]
fn extract_converts_video_to_wav() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let video = temp_dir.path().join("clip.mp4");

    duct::cmd!(
        "ffmpeg", "-f", "lavfi", "-i", "sine=frequency=440:duration=1", "-f", "lavfi", "-i",
        "color=c=black:s=64x64:d=1", "-shortest", "-y", &video
    )
    .stderr_null()
    .run()
    .expect("failed to create test video");

    let cli = Cli::parse_from(["scribe", "extract", video.to_str().unwrap()]);

    run_cli(cli).expect("failed to extract audio");

    let reader = hound::WavReader::open(temp_dir.path().join("clip.wav")).expect("WAV not found");
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
}
