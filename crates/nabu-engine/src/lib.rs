//! Nabu engine crate.
//!
//! This crate owns the surface capability contract and the record/replay
//! machinery used by output-format crates layered on top of it:
//!
//! - `coords` / `paint` / `text` / `raster`: the value types drawing calls
//!   carry (all captured by the recorder).
//! - `surface`: the [`surface::Surface`] trait plus the surrogate (sizing)
//!   and splitter (mirroring) adapters.
//! - `record`: the command journal. Wraps a live surface, appends a command
//!   for every mutating call, and can replay the identical sequence against
//!   a different surface with transform re-anchoring.
//! - `handoff`: the worker-thread protocol that drives callback-style
//!   writers (formats that call "paint me" one or more times) from ordinary
//!   imperative caller code.

pub mod coords;
pub mod handoff;
pub mod logging;
pub mod paint;
pub mod raster;
pub mod record;
pub mod surface;
pub mod text;
