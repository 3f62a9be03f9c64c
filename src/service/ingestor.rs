//! Feeds a [`Leaderboard`] from a line-delimited tweet stream.
//!
//! [`consume`] works on any [`AsyncBufRead`], which keeps the line handling
//! testable without a network. [`Ingestor`] opens the upstream HTTP stream
//! and hands it to [`consume`].
//!
//! Per line:
//!
//! - blank (or whitespace only): a keep-alive heartbeat, not an event
//! - valid JSON: one event, then one tally per hashtag
//! - anything else: one event with no hashtags, logged at `warn`
//!
//! A contention fault from the leaderboard ends ingestion with an error; the
//! end of the stream ends it normally.

use std::sync::Arc;

use futures_util::TryStreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::leaderboard::Leaderboard;
use crate::service::config::ServiceConfig;
use crate::service::{tweet, Result};

/// What a finished ingestion saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Non-blank lines, counted as events.
    pub events: u64,
    /// Hashtags tallied.
    pub hashtags: u64,
    /// Keep-alive lines skipped.
    pub blank_lines: u64,
    /// Lines that were not valid tweet JSON.
    pub malformed: u64,
}

/// Reads `reader` line by line into `board` until end of stream or cancellation.
///
/// # Errors
///
/// I/O errors from the reader, and contention faults from the leaderboard.
pub async fn consume<R>(
    reader: R,
    board: &Leaderboard<String>,
    cancel: &CancellationToken,
) -> Result<IngestSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = IngestSummary::default();
    let mut lines = reader.lines();

    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("ingestion cancelled");
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            info!("end of stream");
            break;
        };

        if line.trim().is_empty() {
            summary.blank_lines += 1;
            debug!(events = summary.events, "blank line in stream");
            continue;
        }

        board.tally_event();
        summary.events += 1;

        let tags = match tweet::hashtags(&line) {
            Ok(tags) => tags,
            Err(err) => {
                summary.malformed += 1;
                warn!(error = %err, "skipping undecodable line");
                continue;
            }
        };

        if !tags.is_empty() {
            debug!(tags = ?tags, "hashtags");
        }
        for tag in tags {
            board.tally_key(tag)?;
            summary.hashtags += 1;
        }
    }

    Ok(summary)
}

/// Streams sampled tweets from the upstream API into a leaderboard.
#[derive(Debug, Clone)]
pub struct Ingestor {
    client: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
    board: Arc<Leaderboard<String>>,
}

impl Ingestor {
    /// Creates an ingestor for the stream described by `config`.
    pub fn new(config: &ServiceConfig, board: Arc<Leaderboard<String>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.stream_url(),
            bearer_token: config.bearer_token.clone(),
            board,
        }
    }

    /// Uses `client` instead of a default one.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The stream URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opens the stream and consumes it until it ends or `cancel` fires.
    ///
    /// # Errors
    ///
    /// Transport errors, non-success HTTP statuses, and contention faults.
    pub async fn run(&self, cancel: CancellationToken) -> Result<IngestSummary> {
        info!(url = %self.url, "requesting stream");

        let mut request = self.client.get(&self.url);
        if let Some(ref token) = self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(IngestSummary::default()),
            response = request.send() => response?,
        };
        let response = response.error_for_status()?;
        info!(status = %response.status(), "stream accepted");

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let reader = StreamReader::new(stream);
        tokio::pin!(reader);

        let summary = consume(reader, &self.board, &cancel).await?;
        info!(
            events = summary.events,
            hashtags = summary.hashtags,
            blank_lines = summary.blank_lines,
            malformed = summary.malformed,
            "ingestion finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeaderboardError;
    use crate::service::ServiceError;
    use crate::snapshot::Standing;
    use std::time::Duration;

    fn tweet(tags: &[&str]) -> String {
        let tags: Vec<String> = tags
            .iter()
            .map(|t| format!(r#"{{"tag":"{}"}}"#, t))
            .collect();
        format!(
            r#"{{"data":{{"text":"x","entities":{{"hashtags":[{}]}}}}}}"#,
            tags.join(",")
        )
    }

    #[tokio::test]
    async fn test_consume_counts_events_and_tags() {
        let board = Leaderboard::new(3).unwrap();
        let input = [
            tweet(&["rust", "go"]),
            String::new(),
            tweet(&["rust"]),
            "   ".to_string(),
            r#"{"data":{"text":"no tags"}}"#.to_string(),
            "{not json".to_string(),
            tweet(&["zig", "rust"]),
        ]
        .join("\n");

        let summary = consume(input.as_bytes(), &board, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            summary,
            IngestSummary {
                events: 5,
                hashtags: 5,
                blank_lines: 2,
                malformed: 1,
            }
        );

        let snapshot = board.current_snapshot();
        assert_eq!(snapshot.total_events, 5);
        assert_eq!(
            snapshot.results(),
            &[
                Standing::new("rust".to_string(), 3),
                Standing::new("go".to_string(), 1),
                Standing::new("zig".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_consume_empty_stream() {
        let board = Leaderboard::new(3).unwrap();
        let summary = consume(&b""[..], &board, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(summary, IngestSummary::default());
        assert!(board.current_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_consume_stops_when_cancelled() {
        let board = Leaderboard::new(3).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let input = tweet(&["rust"]);
        let summary = consume(input.as_bytes(), &board, &cancel).await.unwrap();
        assert_eq!(summary.events, 0);
        assert_eq!(board.total_events(), 0);
    }

    #[tokio::test]
    async fn test_consume_stops_on_contention() {
        let board = Leaderboard::new(3)
            .unwrap()
            .with_lock_timeout(Duration::from_millis(10));
        let input = [tweet(&["rust"]), tweet(&["go"])].join("\n");

        let guard = board.hold_podium();
        let err = consume(input.as_bytes(), &board, &CancellationToken::new())
            .await
            .unwrap_err();
        drop(guard);

        assert!(matches!(
            err,
            ServiceError::Leaderboard(LeaderboardError::Contention { .. })
        ));
        // The event and the increment were recorded before the fault.
        assert_eq!(board.total_events(), 1);
        assert_eq!(board.count("rust"), Some(1));
        assert_eq!(board.count("go"), None);
    }

    #[tokio::test]
    async fn test_consume_handles_crlf() {
        let board = Leaderboard::new(3).unwrap();
        let input = format!("{}\r\n\r\n{}\r\n", tweet(&["a"]), tweet(&["a"]));
        let summary = consume(input.as_bytes(), &board, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(summary.events, 2);
        assert_eq!(summary.blank_lines, 1);
        assert_eq!(board.count("a"), Some(2));
    }
}
