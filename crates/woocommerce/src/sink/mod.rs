//! Output sinks for Singer messages
//!
//! The sync engine writes through the [`RecordSink`] trait so the same loop
//! can emit to standard output in production and to memory in tests.

mod memory;
mod singer;
mod traits;

pub use memory::{InMemorySink, SinkMessage};
pub use singer::SingerWriter;
pub use traits::RecordSink;
