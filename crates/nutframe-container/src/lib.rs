//! Container descriptions for nutframe.
//!
//! Frame decoding needs the tables a NUT main header and stream headers
//! define: the frame-code table, the elision headers and per-stream
//! timestamp parameters. This crate loads them from a JSON description so
//! frame records can be decoded without parsing file-level structures.

pub mod config;
pub mod container;
pub mod description;
pub mod error;

pub use config::LoadConfig;
pub use container::Container;
pub use description::{ContainerDescription, FrameCodeDescription, StreamDescription};
pub use error::{ContainerError, Result};
