//! Capture replay feed.
//!
//! Plays a file of newline-delimited JSON frames back at a fixed
//! cadence, as if a backend were streaming them live. Handy for
//! reviewing an interesting fermentation run after the fact.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{info, warn};

use super::{Feed, FeedEvent, LinkStatus};

/// A feed that replays a frame capture file.
///
/// The feed goes through the same lifecycle as a live link: connecting,
/// connected, one frame per cadence tick, then disconnected when the
/// capture runs out. A file that cannot be opened surfaces as a fault
/// followed by a disconnect.
#[derive(Debug)]
pub struct ReplayFeed {
    receiver: mpsc::Receiver<FeedEvent>,
    description: String,
    stop_tx: watch::Sender<bool>,
}

impl ReplayFeed {
    /// Spawn the playback task for `path`, one frame every `cadence`.
    pub fn spawn<P: AsRef<Path>>(path: P, cadence: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("replay: {}", path.display());
        let (tx, rx) = mpsc::channel(64);
        let (stop_tx, stop_rx) = watch::channel(false);

        tokio::spawn(run_replay(path, cadence, tx, stop_rx));

        Self {
            receiver: rx,
            description,
            stop_tx,
        }
    }

    /// Stop playback early.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

impl Drop for ReplayFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Feed for ReplayFeed {
    fn poll(&mut self) -> Option<FeedEvent> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

async fn run_replay(
    path: PathBuf,
    cadence: Duration,
    events: mpsc::Sender<FeedEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    if events.send(FeedEvent::Link(LinkStatus::Connecting)).await.is_err() {
        return;
    }

    let file = match fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "replay open failed");
            let fault = FeedEvent::Fault(format!("open failed: {}", e));
            let _ = events.send(fault).await;
            let _ = events.send(FeedEvent::Link(LinkStatus::Disconnected)).await;
            return;
        }
    };

    if events.send(FeedEvent::Link(LinkStatus::Connected)).await.is_err() {
        return;
    }

    let mut lines = BufReader::new(file).lines();
    let mut ticker = time::interval(cadence);

    loop {
        tokio::select! {
            _ = ticker.tick() => match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if events.send(FeedEvent::Frame(line)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = events.send(FeedEvent::Fault(format!("read error: {}", e))).await;
                    break;
                }
            },
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return;
                }
            }
        }
    }

    info!(path = %path.display(), "replay finished");
    let _ = events.send(FeedEvent::Link(LinkStatus::Disconnected)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn drain(feed: &mut ReplayFeed) -> Vec<FeedEvent> {
        let mut events = Vec::new();
        while let Some(event) = feed.poll() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_replay_plays_capture_then_disconnects() {
        let mut capture = NamedTempFile::new().unwrap();
        writeln!(capture, "{{\"type\":\"pong\"}}").unwrap();
        writeln!(capture).unwrap();
        writeln!(capture, "{{\"type\":\"pong\"}}").unwrap();
        capture.flush().unwrap();

        let mut feed = ReplayFeed::spawn(capture.path(), Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let events = drain(&mut feed);
        assert_eq!(
            events,
            vec![
                FeedEvent::Link(LinkStatus::Connecting),
                FeedEvent::Link(LinkStatus::Connected),
                FeedEvent::Frame("{\"type\":\"pong\"}".to_string()),
                FeedEvent::Frame("{\"type\":\"pong\"}".to_string()),
                FeedEvent::Link(LinkStatus::Disconnected),
            ]
        );
    }

    #[tokio::test]
    async fn test_replay_missing_file_reports_fault() {
        let mut feed = ReplayFeed::spawn("/nonexistent/capture.ndjson", Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let events = drain(&mut feed);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], FeedEvent::Link(LinkStatus::Connecting));
        assert!(matches!(&events[1], FeedEvent::Fault(reason) if reason.contains("open failed")));
        assert_eq!(events[2], FeedEvent::Link(LinkStatus::Disconnected));
    }
}
