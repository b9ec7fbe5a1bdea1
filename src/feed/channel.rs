//! Channel-based feed.
//!
//! Receives feed events through a tokio mpsc channel. Useful for
//! embedding the tracker in a host application that already owns the
//! stream, and for driving the app deterministically in tests.

use tokio::sync::mpsc;

use super::{Feed, FeedEvent, LinkStatus};

/// A feed whose events are pushed by the caller.
///
/// The producer half is a plain mpsc sender; drop it to end the feed.
/// After the last sender goes away, the feed drains whatever is still
/// buffered, reports one final [`LinkStatus::Disconnected`], and then
/// yields nothing.
#[derive(Debug)]
pub struct ChannelFeed {
    receiver: mpsc::Receiver<FeedEvent>,
    description: String,
    /// Whether the final disconnect has been reported.
    closed: bool,
}

impl ChannelFeed {
    pub fn new(receiver: mpsc::Receiver<FeedEvent>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            closed: false,
        }
    }

    /// Create a sender/feed pair.
    pub fn create(source_description: &str) -> (mpsc::Sender<FeedEvent>, Self) {
        let (tx, rx) = mpsc::channel(64);
        (tx, Self::new(rx, source_description))
    }
}

impl Feed for ChannelFeed {
    fn poll(&mut self) -> Option<FeedEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if self.closed {
                    None
                } else {
                    self.closed = true;
                    Some(FeedEvent::Link(LinkStatus::Disconnected))
                }
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_feed_delivers_events_in_order() {
        let (tx, mut feed) = ChannelFeed::create("test");
        assert_eq!(feed.description(), "channel: test");

        tx.send(FeedEvent::Link(LinkStatus::Connected)).await.unwrap();
        tx.send(FeedEvent::Frame("{\"type\":\"pong\"}".to_string()))
            .await
            .unwrap();

        assert_eq!(feed.poll(), Some(FeedEvent::Link(LinkStatus::Connected)));
        assert_eq!(
            feed.poll(),
            Some(FeedEvent::Frame("{\"type\":\"pong\"}".to_string()))
        );
        // Senders alive, nothing queued
        assert_eq!(feed.poll(), None);
    }

    #[tokio::test]
    async fn test_channel_feed_reports_close_once_after_drain() {
        let (tx, mut feed) = ChannelFeed::create("test");
        tx.send(FeedEvent::Frame("{}".to_string())).await.unwrap();
        drop(tx);

        // Buffered events first, then a single disconnect
        assert_eq!(feed.poll(), Some(FeedEvent::Frame("{}".to_string())));
        assert_eq!(feed.poll(), Some(FeedEvent::Link(LinkStatus::Disconnected)));
        assert_eq!(feed.poll(), None);
        assert_eq!(feed.poll(), None);
    }
}
