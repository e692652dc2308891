#![deny(unsafe_code)]
//! CPU-side drawing of textswarm frames.
//!
//! Sits between `textswarm-core` (which produces [`Frame`]s) and hosts that
//! want pixels: the CLI writes PNG snapshots, embedders can take the raw
//! RGBA buffer from [`pixel::frame_to_rgba`].
//!
//! [`Frame`]: textswarm_core::Frame

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{frame_to_rgba, RenderStyle};
