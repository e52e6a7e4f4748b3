//! Presentation of dashboard snapshots
//!
//! Formatters are read-only consumers of [`DashboardState`](crate::DashboardState);
//! they never issue requests.

pub mod formatter;

pub use formatter::{CompactFormatter, Formatter, FormatterFactory, Layout, TerminalFormatter};
