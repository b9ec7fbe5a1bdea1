//! Batch state tracking: classification, windows, transitions, advisories.
//!
//! This module owns everything the dashboard knows about a batch. All
//! mutation funnels through [`BatchStore::apply_update`].
//!
//! ## Submodules
//!
//! - [`tier`]: Quality tier classification from the 0-100 score
//! - [`window`]: Bounded sliding window of recent measurements
//! - [`advisory`]: Transition events and the advisory rule table
//! - [`store`]: Per-batch records and the single update path
//! - [`export`]: CSV export of a batch's window
//!
//! ## Update Flow
//!
//! ```text
//! Measurement (from the dispatcher)
//!        │
//!        ▼
//! BatchStore::apply_update()
//!        │
//!        ├──▶ classify()            (tier from score)
//!        ├──▶ TransitionEvent       (appended on tier change)
//!        ├──▶ advisory_for()        (rule table, on tier change)
//!        └──▶ TrendWindow::push()   (evicts oldest at capacity)
//! ```

pub mod advisory;
pub mod export;
pub mod store;
pub mod tier;
pub mod window;

pub use advisory::{advisory_for, template_for, Advisory, AdvisoryTemplate, TransitionEvent, Urgency};
pub use export::{export_window, window_to_csv};
pub use store::{BatchRecord, BatchStore, UpdateError, UpdateOutcome, ADVISORY_CAP};
pub use tier::{classify, InvalidScore, QualityTier};
pub use window::{
    Measurement, ParamValues, Parameter, SeriesSet, TrendWindow, WindowSeries, WINDOW_CAPACITY,
};
