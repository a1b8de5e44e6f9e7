//! mien-core — Emotion record aggregation engine.
//!
//! Ingests per-image face/emotion detection results stored as discrete
//! JSON files, flattens them into a uniform record stream, and serves
//! that stream through point lookups, ordered listing and aggregate
//! statistics. The view layer filters, sorts and paginates the same
//! records for display.

pub mod decode;
pub mod stats;
pub mod store;
pub mod types;
pub mod view;

pub use stats::EmotionStats;
pub use store::{RecordStore, StoreError};
pub use types::{EmotionRecord, FaceReport, ImageReport};
pub use view::{Page, SortDirection, SortKey, ViewState, PAGE_SIZE};
