//! Transcript acquisition for vidlens.
//!
//! This crate provides:
//! - Decoders for the timed-event JSON (`json3`) and subtitle-cue (WebVTT)
//!   caption formats
//! - Caption track modelling and candidate selection
//! - The primary caption source (YouTube InnerTube) and the secondary
//!   metadata extractor (yt-dlp)
//! - An ordered fallback chain of acquisition strategies that returns the
//!   first usable transcript or an explicit failure

pub mod chain;
pub mod config;
pub mod decode;
pub mod error;
pub mod innertube;
pub mod source;
pub mod strategy;
pub mod track;
pub mod ytdlp;

pub use chain::{
    StrategyFailure, Transcript, TranscriptChain, TranscriptProvider, TranscriptUnavailable,
    NO_TRANSCRIPT_MESSAGE,
};
pub use config::TranscriptConfig;
pub use error::{TranscriptError, TranscriptResult};
pub use innertube::InnerTubeClient;
pub use source::{CaptionSource, MetadataExtractor};
pub use strategy::{
    DirectFetchStrategy, ListAndPickStrategy, SecondarySourceStrategy, TranscriptStrategy,
};
pub use track::{CaptionFormat, CaptionKind, CaptionTrack, TrackFormat};
pub use ytdlp::YtDlpExtractor;
