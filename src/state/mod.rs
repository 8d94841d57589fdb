//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlStage`: where the traversal is in the category → episode hierarchy
//! - `CheckpointState`: in-flight results and the next show to process
//! - `HistoryIndex`: shows already extracted by earlier runs

mod checkpoint;
mod history;
mod stage;

pub use checkpoint::CheckpointState;
pub use history::HistoryIndex;
pub use stage::CrawlStage;
