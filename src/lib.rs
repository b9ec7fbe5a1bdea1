// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # fermwatch
//!
//! A real-time TUI and library for tracking fermentation batch quality.
//!
//! This crate consumes a stream of fermentation measurements (actual pH,
//! temperature, and CO2 readings plus golden-standard ideals and a quality
//! score), classifies each batch into a quality tier, detects tier
//! transitions, generates advisories for degradations, and renders
//! everything in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐ │
//! │  │  app    │───▶│ dispatch │───▶│   data   │───▶│ ui/term  │ │
//! │  │ (state) │    │ (frames) │    │ (store)  │    └──────────┘ │
//! │  └────┬────┘    └──────────┘    └──────────┘                 │
//! │       │                                                       │
//! │       ▼                                                       │
//! │  ┌─────────┐                                                  │
//! │  │  feed   │◀── SocketFeed | ReplayFeed | ChannelFeed | Demo  │
//! │  │ (input) │                                                  │
//! │  └─────────┘                                                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, tab navigation, and feed pumping
//! - **[`feed`]**: Stream source abstraction ([`Feed`] trait) with a TCP
//!   client (automatic reconnect, heartbeat), capture replay, channel
//!   input, and a built-in demo generator
//! - **[`dispatch`]**: Decodes raw frames and applies them to the store
//! - **[`data`]**: The tracking core - tier classification, per-unit
//!   measurement windows, transition detection, and advisory generation
//! - **[`ui`]**: Terminal rendering using ratatui - overview table,
//!   trend charts, advisory list, and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Track a live backend
//! fermwatch --connect ferm.local:4455
//!
//! # Try it without a server
//! fermwatch --demo
//!
//! # Replay a captured run
//! fermwatch --replay tuesday-batch3.ndjson
//! ```
//!
//! ### As a library with a channel feed
//!
//! ```
//! use fermwatch::{App, ChannelFeed, Settings};
//!
//! // Create a channel for pushing stream events
//! let (tx, feed) = ChannelFeed::create("embedded");
//!
//! // Create the app
//! let app = App::new(Box::new(feed), &Settings::default());
//! ```
//!
//! ### Classifying scores directly
//!
//! ```
//! use fermwatch::{classify, QualityTier};
//!
//! assert_eq!(classify(96.4).unwrap(), QualityTier::Perfect);
//! assert_eq!(classify(90.0).unwrap(), QualityTier::Acceptable);
//! assert!(classify(f64::NAN).is_err());
//! ```
//!
//! ### Running the demo generator
//!
//! ```no_run
//! use std::time::Duration;
//! use fermwatch::DemoFeed;
//!
//! # tokio_test::block_on(async {
//! let feed = DemoFeed::spawn(Duration::from_millis(500));
//! # });
//! ```

pub mod app;
pub mod data;
pub mod dispatch;
pub mod events;
pub mod feed;
pub mod settings;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    classify, Advisory, BatchRecord, BatchStore, InvalidScore, Measurement, ParamValues,
    Parameter, QualityTier, TransitionEvent, TrendWindow, UpdateError, UpdateOutcome, Urgency,
    ADVISORY_CAP, WINDOW_CAPACITY,
};
pub use dispatch::dispatch;
pub use feed::{
    ChannelFeed, DemoFeed, Feed, FeedEvent, LinkStatus, ReplayFeed, SocketFeed,
    HEARTBEAT_INTERVAL, RECONNECT_DELAY,
};
pub use settings::{Settings, ThemeChoice};
