//! Incremental sync engine
//!
//! Pages through the orders resource from a fixed lower bound, emits each
//! normalized order, and checkpoints the highest `date_created` seen.

mod checkpoint;
mod orders;
mod runner;
mod scripted;

pub use checkpoint::{LAST_UPDATE, get_start, set_bookmark, set_currently_syncing};
pub use orders::{PageSource, SyncStats, sync_orders};
pub use runner::{STREAMS, Stream, do_sync, selected_streams, streams_to_sync};
pub use scripted::ScriptedPages;
