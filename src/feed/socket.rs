//! TCP streaming client with automatic reconnect and heartbeat.
//!
//! A background task owns the socket lifecycle: connect, read
//! newline-delimited JSON frames, send a heartbeat ping on a fixed
//! interval, and retry [`RECONNECT_DELAY`] after the link drops. The task
//! never gives up; it reconnects for the life of the process.
//!
//! Lifecycle decisions live in [`LinkSupervisor`], a plain state machine
//! the task consults. It owns the single pending retry deadline, so two
//! closes in quick succession reschedule one retry instead of stacking
//! two.

use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{debug, info, warn};

use super::message::ping_line;
use super::{Feed, FeedEvent, LinkStatus};

/// Delay between a link loss and the next connect attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Interval between outbound heartbeat pings while connected.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Link lifecycle state machine.
///
/// Holds at most one pending retry deadline: opening clears it, every
/// close replaces it, and transport errors never touch it (the close that
/// follows an error is what schedules the retry).
#[derive(Debug)]
pub struct LinkSupervisor {
    status: LinkStatus,
    retry_at: Option<Instant>,
    retry_delay: Duration,
}

impl Default for LinkSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkSupervisor {
    pub fn new() -> Self {
        Self {
            status: LinkStatus::Connecting,
            retry_at: None,
            retry_delay: RECONNECT_DELAY,
        }
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// The pending retry deadline, if a close scheduled one.
    pub fn retry_at(&self) -> Option<Instant> {
        self.retry_at
    }

    /// The transport opened: clear any pending retry.
    pub fn on_open(&mut self) -> LinkStatus {
        self.retry_at = None;
        self.status = LinkStatus::Connected;
        self.status
    }

    /// The transport closed (cleanly or not): schedule the retry,
    /// replacing any deadline a previous close left behind.
    pub fn on_close(&mut self, now: Instant) -> LinkStatus {
        self.retry_at = Some(now + self.retry_delay);
        self.status = LinkStatus::Disconnected;
        self.status
    }

    /// A retry is starting: consume the deadline.
    pub fn on_retry(&mut self) -> LinkStatus {
        self.retry_at = None;
        self.status = LinkStatus::Connecting;
        self.status
    }

    /// Whether the pending retry deadline has passed.
    pub fn retry_due(&self, now: Instant) -> bool {
        self.retry_at.is_some_and(|at| now >= at)
    }
}

/// Streaming TCP feed.
///
/// `spawn` starts the background client; events arrive through `poll`.
/// Dropping the feed stops the client, which cancels the heartbeat and
/// any pending reconnect.
#[derive(Debug)]
pub struct SocketFeed {
    receiver: mpsc::Receiver<FeedEvent>,
    description: String,
    stop_tx: watch::Sender<bool>,
}

impl SocketFeed {
    /// Spawn the background client for `addr` (host:port).
    pub fn spawn(addr: &str) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let (stop_tx, stop_rx) = watch::channel(false);
        let target = addr.to_string();

        tokio::spawn(run_client(target, tx, stop_rx));

        Self {
            receiver: rx,
            description: format!("stream: {}", addr),
            stop_tx,
        }
    }

    /// Stop the background client.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

impl Drop for SocketFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Feed for SocketFeed {
    fn poll(&mut self) -> Option<FeedEvent> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Connect/read/retry loop. Returns only on stop or when the event
/// receiver goes away.
async fn run_client(addr: String, events: mpsc::Sender<FeedEvent>, mut stop_rx: watch::Receiver<bool>) {
    let mut supervisor = LinkSupervisor::new();

    loop {
        if events.send(FeedEvent::Link(supervisor.status())).await.is_err() {
            return;
        }

        let connected = tokio::select! {
            result = TcpStream::connect(&addr) => result,
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return;
                }
                continue;
            }
        };

        match connected {
            Ok(stream) => {
                supervisor.on_open();
                info!(addr = %addr, "stream connected");
                if events.send(FeedEvent::Link(LinkStatus::Connected)).await.is_err() {
                    return;
                }

                match drive_link(stream, &events, &mut stop_rx).await {
                    LinkClose::Stopped => return,
                    LinkClose::Eof => info!("stream closed by server"),
                    LinkClose::Failed(reason) => {
                        warn!(reason = %reason, "stream failed");
                        if events.send(FeedEvent::Fault(reason)).await.is_err() {
                            return;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(addr = %addr, error = %e, "connect failed");
                let fault = FeedEvent::Fault(format!("connect failed: {}", e));
                if events.send(fault).await.is_err() {
                    return;
                }
            }
        }

        supervisor.on_close(Instant::now());
        if events.send(FeedEvent::Link(LinkStatus::Disconnected)).await.is_err() {
            return;
        }

        if let Some(deadline) = supervisor.retry_at() {
            let wait = deadline.saturating_duration_since(Instant::now());
            tokio::select! {
                _ = time::sleep(wait) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        return;
                    }
                }
            }
        }
        supervisor.on_retry();
    }
}

#[derive(Debug)]
enum LinkClose {
    Eof,
    Failed(String),
    Stopped,
}

/// Pump one open connection: forward inbound frames, ping on the
/// heartbeat interval, bail on stop.
async fn drive_link<S>(
    stream: S,
    events: &mpsc::Sender<FeedEvent>,
    stop_rx: &mut watch::Receiver<bool>,
) -> LinkClose
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut lines = BufReader::new(read_half).lines();
    // First ping one full interval after connect, not immediately
    let mut heartbeat =
        time::interval_at(time::Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            // next_line is cancel-safe: a partial frame survives the other
            // arms winning the race
            result = lines.next_line() => match result {
                Ok(Some(frame)) => {
                    if frame.trim().is_empty() {
                        continue;
                    }
                    if events.send(FeedEvent::Frame(frame)).await.is_err() {
                        return LinkClose::Stopped;
                    }
                }
                Ok(None) => return LinkClose::Eof,
                Err(e) => return LinkClose::Failed(format!("read error: {}", e)),
            },
            _ = heartbeat.tick() => {
                if let Err(e) = write_half.write_all(ping_line().as_bytes()).await {
                    return LinkClose::Failed(format!("heartbeat send failed: {}", e));
                }
                debug!("heartbeat ping sent");
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return LinkClose::Stopped;
                }
            }
        }
    }
}
