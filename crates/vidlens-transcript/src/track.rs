//! Caption tracks and candidate selection.

use std::fmt;

use crate::decode::{decode_subtitle_cues, parse_timed_events};
use crate::error::TranscriptResult;

/// Whether a track was authored by a person or generated by speech recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionKind {
    Manual,
    Automatic,
}

/// Caption serialization formats we can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionFormat {
    /// `json3` timed events
    TimedJson,
    /// WebVTT cues
    SubtitleCue,
}

impl CaptionFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json3" => Some(Self::TimedJson),
            "vtt" => Some(Self::SubtitleCue),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::TimedJson => "json3",
            Self::SubtitleCue => "vtt",
        }
    }

    /// Decode raw caption content in this format into flat text.
    pub fn decode(&self, raw: &str) -> TranscriptResult<String> {
        match self {
            Self::TimedJson => parse_timed_events(raw),
            Self::SubtitleCue => Ok(decode_subtitle_cues(raw)),
        }
    }
}

impl fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One downloadable serialization of a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFormat {
    pub format: CaptionFormat,
    pub url: String,
}

/// A caption track available for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub kind: CaptionKind,
    pub language: String,
    pub formats: Vec<TrackFormat>,
}

impl CaptionTrack {
    pub fn new(kind: CaptionKind, language: impl Into<String>) -> Self {
        Self {
            kind,
            language: language.into(),
            formats: Vec::new(),
        }
    }

    pub fn with_format(mut self, format: CaptionFormat, url: impl Into<String>) -> Self {
        self.formats.push(TrackFormat {
            format,
            url: url.into(),
        });
        self
    }

    /// Timed events when offered, otherwise subtitle cues.
    pub fn preferred_format(&self) -> Option<&TrackFormat> {
        self.format(CaptionFormat::TimedJson)
            .or_else(|| self.format(CaptionFormat::SubtitleCue))
    }

    fn format(&self, format: CaptionFormat) -> Option<&TrackFormat> {
        self.formats.iter().find(|f| f.format == format)
    }

    fn is(&self, kind: CaptionKind, language: &str) -> bool {
        self.kind == kind && self.language == language
    }
}

impl fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            CaptionKind::Manual => "manual",
            CaptionKind::Automatic => "auto",
        };
        write!(f, "{} ({})", self.language, kind)
    }
}

/// Pick the track for the first preferred language that has one, manual
/// tracks before generated ones.
pub fn select_by_language<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| t.is(CaptionKind::Manual, lang))
            .or_else(|| tracks.iter().find(|t| t.is(CaptionKind::Automatic, lang)))
    })
}

/// Order tracks for the list-and-pick strategy: manual tracks first, each
/// group keeping the source's enumeration order.
pub fn rank_tracks(tracks: &[CaptionTrack]) -> Vec<&CaptionTrack> {
    let mut ranked: Vec<&CaptionTrack> = tracks.iter().collect();
    ranked.sort_by_key(|t| t.kind == CaptionKind::Automatic);
    ranked
}

/// Choose the secondary-source candidate: manual English, then automatic
/// English, then any `en*` language (manual first). Tracks without a
/// decodable format are never chosen.
pub fn select_english_candidate(tracks: &[CaptionTrack]) -> Option<(&CaptionTrack, &TrackFormat)> {
    let usable = || {
        tracks
            .iter()
            .filter_map(|t| t.preferred_format().map(|f| (t, f)))
    };

    usable()
        .find(|(t, _)| t.is(CaptionKind::Manual, "en"))
        .or_else(|| usable().find(|(t, _)| t.is(CaptionKind::Automatic, "en")))
        .or_else(|| {
            usable().find(|(t, _)| t.kind == CaptionKind::Manual && t.language.starts_with("en"))
        })
        .or_else(|| usable().find(|(t, _)| t.language.starts_with("en")))
}
