//! One handler per CLI mode.

pub mod explain;
pub mod run;
pub mod serve;
