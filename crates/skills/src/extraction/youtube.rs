//! YouTube transcript retrieval.
//!
//! Transcripts are read the same way a browser would find them: the watch
//! page embeds a `captionTracks` array whose entries point at timedtext XML.
//! Every failure is reported as a fixed, user-facing message rather than an
//! error, so a bad link never aborts a request.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::{Captures, Regex};
use serde::Deserialize;
use url::Url;

use datasmith_core::{config::ExtractionConfig, traits::TranscriptFetcher, Error, Result};

use super::preview;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id regex must compile"));
static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b[^>]*>(.*?)</text>").expect("timedtext segment regex must compile")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex must compile"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity regex must compile")
});

/// Why a transcript could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("not a recognisable YouTube video URL: {0}")]
    InvalidVideoUrl(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("YouTube is rate limiting requests")]
    TooManyRequests,

    #[error("video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("no transcript found for video {0}")]
    NoTranscriptFound(String),

    #[error("could not parse transcript data: {0}")]
    ParseFailed(String),
}

impl TranscriptError {
    /// Variant name, shown to users.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidVideoUrl(_) => "InvalidVideoUrl",
            Self::RequestFailed(_) => "RequestFailed",
            Self::TooManyRequests => "TooManyRequests",
            Self::VideoUnavailable(_) => "VideoUnavailable",
            Self::TranscriptsDisabled(_) => "TranscriptsDisabled",
            Self::NoTranscriptFound(_) => "NoTranscriptFound",
            Self::ParseFailed(_) => "ParseFailed",
        }
    }

    /// The message returned in place of a transcript.
    pub fn user_message(&self) -> String {
        format!(
            "Transcript fetching failed. [Tool Invoked, Error Handled] Final action: Returned the standard error message. (Specific Error: {})",
            self.kind()
        )
    }
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        Self::RequestFailed(e.to_string())
    }
}

/// Resolve the 11-character video id from a link or a bare id.
pub fn video_id(input: &str) -> Option<String> {
    let input = input
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')' | ']' | '"' | '\'' | '!' | '?'));

    if VIDEO_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    let url = if input.contains("://") {
        Url::parse(input).ok()?
    } else {
        Url::parse(&format!("https://{}", input)).ok()?
    };

    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        h if h == "youtube.com" || h.ends_with(".youtube.com") || h == "youtube-nocookie.com" => {
            match url.query_pairs().find(|(k, _)| k == "v") {
                Some((_, v)) => Some(v.into_owned()),
                None => match (segments.next(), segments.next()) {
                    (Some("e" | "embed" | "shorts" | "v" | "live"), Some(id)) => Some(id.to_string()),
                    _ => None,
                },
            }
        }
        _ => None,
    }?;

    VIDEO_ID_RE.is_match(&candidate).then_some(candidate)
}

/// One entry of the watch page's `captionTracks` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
    /// `asr` for auto-generated tracks.
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Transcript fetcher backed by YouTube's public watch pages.
pub struct YouTubeTranscripts {
    client: reqwest::Client,
    base_url: Url,
    language: String,
}

impl YouTubeTranscripts {
    pub fn new(base_url: &str, language: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid transcript base URL {}: {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            language: language.into(),
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Self::new(
            &config.transcript_base_url,
            config.transcript_language.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Fetch and flatten the transcript, surfacing the failure reason.
    pub async fn try_fetch(&self, url: &str) -> std::result::Result<String, TranscriptError> {
        let id = video_id(url).ok_or_else(|| TranscriptError::InvalidVideoUrl(url.to_string()))?;

        let page = self.watch_page(&id).await?;
        let tracks = caption_tracks(&page, &id)?;
        let track = self
            .select_track(&tracks)
            .ok_or_else(|| TranscriptError::NoTranscriptFound(id.clone()))?;

        tracing::debug!(
            video_id = %id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Fetching caption track"
        );

        let xml = self.timedtext(&track.base_url).await?;
        let transcript = parse_timedtext(&xml);
        if transcript.is_empty() {
            return Err(TranscriptError::NoTranscriptFound(id));
        }
        Ok(transcript)
    }

    async fn watch_page(&self, id: &str) -> std::result::Result<String, TranscriptError> {
        let mut url = self
            .base_url
            .join("watch")
            .map_err(|e| TranscriptError::RequestFailed(e.to_string()))?;
        url.query_pairs_mut().append_pair("v", id);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, format!("{},en;q=0.8", self.language))
            .send()
            .await?;
        check_status(response.status())?;
        Ok(response.text().await?)
    }

    async fn timedtext(&self, track_url: &str) -> std::result::Result<String, TranscriptError> {
        let url = self
            .base_url
            .join(track_url)
            .map_err(|e| TranscriptError::ParseFailed(format!("caption URL {}: {}", track_url, e)))?;

        let response = self.client.get(url).send().await?;
        check_status(response.status())?;
        Ok(response.text().await?)
    }

    /// Manual track in the preferred language, then a generated one, then
    /// whatever comes first.
    fn select_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        let preferred = |t: &&CaptionTrack| t.language_code.eq_ignore_ascii_case(&self.language);
        tracks
            .iter()
            .filter(preferred)
            .find(|t| !t.is_generated())
            .or_else(|| tracks.iter().find(preferred))
            .or_else(|| tracks.first())
    }
}

#[async_trait]
impl TranscriptFetcher for YouTubeTranscripts {
    async fn fetch_transcript(&self, url: &str) -> Result<String> {
        match self.try_fetch(url).await {
            Ok(transcript) => {
                tracing::info!(
                    url = %url,
                    chars = transcript.len(),
                    preview = %preview(&transcript, 50),
                    "Transcript fetched"
                );
                Ok(transcript)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, kind = e.kind(), "Transcript fetch failed");
                Ok(e.user_message())
            }
        }
    }
}

fn check_status(status: reqwest::StatusCode) -> std::result::Result<(), TranscriptError> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::TooManyRequests);
    }
    if !status.is_success() {
        return Err(TranscriptError::RequestFailed(format!("HTTP {}", status)));
    }
    Ok(())
}

/// Pull the `captionTracks` array out of a watch page.
fn caption_tracks(page: &str, id: &str) -> std::result::Result<Vec<CaptionTrack>, TranscriptError> {
    const MARKER: &str = "\"captionTracks\":";

    let Some(pos) = page.find(MARKER) else {
        if page.contains("\"playabilityStatus\":{\"status\":\"ERROR\"")
            || page.contains("\"playabilityStatus\":{\"status\":\"LOGIN_REQUIRED\"")
        {
            return Err(TranscriptError::VideoUnavailable(id.to_string()));
        }
        return Err(TranscriptError::TranscriptsDisabled(id.to_string()));
    };

    let rest = &page[pos + MARKER.len()..];
    let array = json_array_prefix(rest)
        .ok_or_else(|| TranscriptError::ParseFailed("unterminated captionTracks array".into()))?;

    let tracks: Vec<CaptionTrack> =
        serde_json::from_str(array).map_err(|e| TranscriptError::ParseFailed(e.to_string()))?;
    if tracks.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled(id.to_string()));
    }
    Ok(tracks)
}

/// The balanced `[...]` at the start of `s`, skipping leading whitespace.
fn json_array_prefix(s: &str) -> Option<&str> {
    let start = s.find(|c: char| !c.is_whitespace())?;
    if !s[start..].starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Flatten timedtext XML into one line of plain text.
fn parse_timedtext(xml: &str) -> String {
    let segments: Vec<String> = SEGMENT_RE
        .captures_iter(xml)
        .map(|caps| {
            // Caption bodies are HTML escaped inside XML escaping.
            let text = decode_entities(&decode_entities(&caps[1]));
            TAG_RE.replace_all(&text, "").trim().to_string()
        })
        .collect();

    // Whitespace inside a segment is kept as captioned.
    segments.join(" ").trim().to_string()
}

fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
