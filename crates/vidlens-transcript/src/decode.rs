//! Caption format decoders.
//!
//! Both decoders are pure and flatten a caption document into a single line
//! of plain text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::TranscriptResult;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Timed-event caption document (`fmt=json3`).
#[derive(Debug, Default, Deserialize)]
pub struct TimedEventDocument {
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimedEvent {
    #[serde(default)]
    pub segs: Option<Vec<TimedSegment>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimedSegment {
    #[serde(default)]
    pub utf8: Option<String>,
}

/// Flatten timed events: segments are concatenated within an event and
/// events are joined with single spaces. Events without segments are skipped.
pub fn decode_timed_events(document: &TimedEventDocument) -> String {
    document
        .events
        .iter()
        .filter_map(|event| match event.segs.as_deref() {
            Some(segs) if !segs.is_empty() => Some(
                segs.iter()
                    .filter_map(|seg| seg.utf8.as_deref())
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse and flatten a raw timed-event JSON document.
pub fn parse_timed_events(raw: &str) -> TranscriptResult<String> {
    let document: TimedEventDocument = serde_json::from_str(raw)?;
    Ok(decode_timed_events(&document))
}

/// Flatten subtitle-cue text (WebVTT).
///
/// Header lines, timing lines and markup tags are removed, then runs of
/// identical adjacent lines are collapsed to one. Rolling captions repeat the
/// previous line in every cue, so only consecutive duplicates are dropped.
pub fn decode_subtitle_cues(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();

        if is_header_line(line) || line.contains("-->") {
            continue;
        }

        let text = TAG_PATTERN.replace_all(line, "");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if lines.last().map(String::as_str) != Some(text) {
            lines.push(text.to_string());
        }
    }

    lines.join(" ")
}

fn is_header_line(line: &str) -> bool {
    line.starts_with("WEBVTT") || line.starts_with("Kind:") || line.starts_with("Language:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_events_basic() {
        let raw = r#"{"events":[{"segs":[{"utf8":"a"}]},{"segs":[{"utf8":"b"},{"utf8":"c"}]}]}"#;
        assert_eq!(parse_timed_events(raw).unwrap(), "a bc");
    }

    #[test]
    fn test_timed_events_skip_events_without_segments() {
        let raw = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 1000, "id": 1},
                {"tStartMs": 0, "segs": [{"utf8": "Hello"}, {"utf8": " there"}]},
                {"tStartMs": 900, "segs": null},
                {"tStartMs": 950, "segs": []},
                {"tStartMs": 1000, "segs": [{"utf8": "world", "acAsrConf": 0}]}
            ]
        }"#;
        assert_eq!(parse_timed_events(raw).unwrap(), "Hello there world");
    }

    #[test]
    fn test_timed_events_segment_without_text() {
        let raw = r#"{"events":[{"segs":[{"tOffsetMs": 10},{"utf8":"x"}]}]}"#;
        assert_eq!(parse_timed_events(raw).unwrap(), "x");
    }

    #[test]
    fn test_timed_events_no_events() {
        assert_eq!(parse_timed_events(r#"{"events": []}"#).unwrap(), "");
        assert_eq!(parse_timed_events("{}").unwrap(), "");
    }

    #[test]
    fn test_timed_events_malformed() {
        assert!(parse_timed_events("<transcript></transcript>").is_err());
        assert!(parse_timed_events(r#"{"events": "nope"}"#).is_err());
    }

    #[test]
    fn test_cues_strip_headers_timings_and_tags() {
        let vtt = "WEBVTT\nKind: captions\nLanguage: en\n\n\
00:00:00.000 --> 00:00:02.000 align:start position:0%\n\
Hello<00:00:00.500><c> everyone</c>\n\n\
00:00:02.000 --> 00:00:04.000\n\
<c.colorE5E5E5>welcome back</c>\n";
        assert_eq!(decode_subtitle_cues(vtt), "Hello everyone welcome back");
    }

    #[test]
    fn test_cues_collapse_adjacent_duplicates() {
        let vtt = "WEBVTT\n\n00:00.000 --> 00:01.000\nHello\n\n\
00:01.000 --> 00:02.000\nHello\n\n00:02.000 --> 00:03.000\nWorld\n";
        assert_eq!(decode_subtitle_cues(vtt), "Hello World");
    }

    #[test]
    fn test_cues_keep_non_adjacent_duplicates() {
        assert_eq!(decode_subtitle_cues("Hello\nWorld\nHello"), "Hello World Hello");
    }

    #[test]
    fn test_cues_duplicates_compared_after_tag_removal() {
        assert_eq!(decode_subtitle_cues("<c>Same</c>\nSame\n<i>Same</i>"), "Same");
    }

    #[test]
    fn test_cues_empty_document() {
        assert_eq!(decode_subtitle_cues("WEBVTT\n\n"), "");
    }
}
