//! Pluggable sources of stream events.
//!
//! Every feed delivers the same event stream: raw frames for the
//! dispatcher plus link lifecycle changes and transport faults for the
//! status bar. The socket feed talks to a live backend; the replay feed
//! plays a capture file; the channel feed is for embedding and tests; the
//! demo feed synthesizes the reference batches locally.

mod channel;
mod demo;
pub mod message;
mod replay;
mod socket;

pub use channel::ChannelFeed;
pub use demo::DemoFeed;
pub use replay::ReplayFeed;
pub use socket::{LinkSupervisor, SocketFeed, HEARTBEAT_INTERVAL, RECONNECT_DELAY};

use std::fmt::Debug;

/// Lifecycle of the streaming link.
///
/// Transport errors are not a lifecycle state; they surface as
/// [`FeedEvent::Fault`] while the link stays in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    /// Initial state, re-entered when a reconnect attempt begins.
    #[default]
    Connecting,
    Connected,
    /// Link lost; a reconnect is pending.
    Disconnected,
}

impl LinkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LinkStatus::Connecting => "connecting",
            LinkStatus::Connected => "connected",
            LinkStatus::Disconnected => "disconnected",
        }
    }
}

/// One unit of feed output.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A raw frame for the dispatcher.
    Frame(String),
    /// The link moved to a new lifecycle state.
    Link(LinkStatus),
    /// A transport error report; the lifecycle state is unchanged.
    Fault(String),
}

/// A source of stream events.
///
/// Implementations push events from a background task into a channel;
/// `poll` drains that channel without blocking, one event per call, from
/// the render loop. All state mutation therefore happens on the render
/// thread, in arrival order.
///
/// # Example
///
/// ```
/// use fermwatch::feed::{ChannelFeed, Feed, FeedEvent, LinkStatus};
///
/// # tokio_test::block_on(async {
/// let (tx, mut feed) = ChannelFeed::create("example");
/// tx.send(FeedEvent::Link(LinkStatus::Connected)).await.unwrap();
///
/// assert_eq!(feed.poll(), Some(FeedEvent::Link(LinkStatus::Connected)));
/// # });
/// ```
pub trait Feed: Send + Debug {
    /// Drain the next pending event, if any. Never blocks.
    fn poll(&mut self) -> Option<FeedEvent>;

    /// Human-readable label for the status bar.
    fn description(&self) -> &str;
}
