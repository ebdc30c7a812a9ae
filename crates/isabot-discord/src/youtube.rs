// ABOUTME: Fetches video metadata by running yt-dlp and decoding its JSON output.
// ABOUTME: Also formats durations, upload dates and view counts for display.

use crate::error::{BotError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command as ProcessCommand;
use tracing::{debug, warn};

/// Which video to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRequest {
    /// Latest upload of the channel youtube.com/@handle.
    MostRecent { handle: String },
    /// A video by its ID.
    ById { id: String },
}

impl VideoRequest {
    /// yt-dlp arguments for this request.
    pub fn args(&self) -> Vec<String> {
        match self {
            VideoRequest::MostRecent { handle } => vec![
                format!("{}/videos", channel_url(handle)),
                "-j".to_string(),
                "-I".to_string(),
                "1".to_string(),
            ],
            VideoRequest::ById { id } => vec![format!("https://youtu.be/{}", id), "-j".to_string()],
        }
    }

    /// Acknowledgement shown while yt-dlp runs.
    pub fn placeholder(&self) -> String {
        match self {
            VideoRequest::MostRecent { handle } => {
                format!("Fetching most recent video for @{}...", handle)
            }
            VideoRequest::ById { id } => format!("Fetching information for video id={}...", id),
        }
    }
}

/// The subset of yt-dlp's `-j` output the bot shows.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub uploader: String,
    /// YYYYMMDD
    #[serde(default)]
    pub upload_date: String,
    /// e.g. "7:32"
    #[serde(default)]
    pub duration_string: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Runs the yt-dlp binary.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
}

impl YtDlp {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run yt-dlp for the request and decode the JSON it prints.
    pub async fn fetch(&self, request: &VideoRequest) -> Result<VideoInfo> {
        let args = request.args();
        debug!(binary = %self.binary, args = ?args, "Spawning yt-dlp");

        let output = ProcessCommand::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| BotError::Media(format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "yt-dlp failed");
            return Err(BotError::Media(format!("yt-dlp exited with {}", output.status)));
        }

        parse_video_json(&output.stdout)
    }
}

/// Decode the first JSON line yt-dlp printed.
pub fn parse_video_json(stdout: &[u8]) -> Result<VideoInfo> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| BotError::Media("yt-dlp printed no video".into()))?;
    Ok(serde_json::from_str(line)?)
}

/// URL of the channel with the given handle.
pub fn channel_url(handle: &str) -> String {
    format!("https://www.youtube.com/@{}", handle)
}

/// "7:32" -> "7m32s", "1:02:03" -> "1h02m03s".
pub fn format_duration(duration: &str) -> String {
    let parts: Vec<&str> = duration.split(':').collect();
    parts
        .iter()
        .rev()
        .zip(["s", "m", "h"])
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// "20231111" -> "2023-11-11". Unparseable input is returned unchanged.
pub fn format_upload_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// 1234567 -> "1,234,567".
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_args() {
        let latest = VideoRequest::MostRecent {
            handle: "Alice".to_string(),
        };
        assert_eq!(
            latest.args(),
            vec!["https://www.youtube.com/@Alice/videos", "-j", "-I", "1"]
        );
        let video = VideoRequest::ById {
            id: "ABCXYZ".to_string(),
        };
        assert_eq!(video.args(), vec!["https://youtu.be/ABCXYZ", "-j"]);
    }

    #[test]
    fn test_placeholders() {
        let latest = VideoRequest::MostRecent {
            handle: "Alice".to_string(),
        };
        assert_eq!(latest.placeholder(), "Fetching most recent video for @Alice...");
        let video = VideoRequest::ById {
            id: "ABC".to_string(),
        };
        assert_eq!(video.placeholder(), "Fetching information for video id=ABC...");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration("7:32"), "7m32s");
        assert_eq!(format_duration("1:02:03"), "1h02m03s");
        assert_eq!(format_duration("45"), "45s");
    }

    #[test]
    fn test_format_upload_date() {
        assert_eq!(format_upload_date("20231111"), "2023-11-11");
        assert_eq!(format_upload_date("unknown"), "unknown");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_parse_video_json() {
        let json = br#"{"id":"abc","title":"Night Rain","uploader":"Alice","upload_date":"20231111","duration_string":"12:05","view_count":15320,"thumbnail":"https://i.ytimg.com/vi/abc/hq.jpg","extra":true}
"#;
        let info = parse_video_json(json).unwrap();
        assert_eq!(info.id, "abc");
        assert_eq!(info.view_count, 15320);
        assert_eq!(info.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/abc/hq.jpg"));
    }

    #[test]
    fn test_parse_video_json_rejects_empty_and_garbage() {
        assert!(matches!(parse_video_json(b"\n"), Err(BotError::Media(_))));
        assert!(matches!(parse_video_json(b"not json"), Err(BotError::Json(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_reports_nonzero_exit() {
        let err = YtDlp::new("false")
            .fetch(&VideoRequest::ById { id: "x".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Media(_)));
    }

    #[tokio::test]
    async fn test_fetch_reports_missing_binary() {
        let err = YtDlp::new("/nonexistent/yt-dlp")
            .fetch(&VideoRequest::ById { id: "x".to_string() })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to run"));
    }
}
