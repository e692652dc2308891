#![deny(unsafe_code)]
//! Core of the textswarm text-to-particle animation.
//!
//! Text is rasterized into a sparse target field ([`raster`]), a fixed swarm
//! of [`Particle`]s is built from the first field, and the swarm is animated
//! toward the text or set loose ([`integrate()`]). When the canvas changes the
//! text is sampled again and [`retarget()`] reconciles the new field into the
//! existing swarm. [`SwarmField`] owns all of it, with a host-driven
//! [`Debouncer`] in front of resizes.

pub mod config;
pub mod debounce;
pub mod error;
pub mod integrate;
pub mod links;
pub mod mask;
pub mod params;
pub mod particle;
pub mod position;
pub mod prng;
pub mod raster;
pub mod retarget;
pub mod scene;
pub mod state;

pub use config::FieldConfig;
pub use debounce::Debouncer;
pub use error::SwarmError;
pub use integrate::{integrate, Extent, Mode};
pub use mask::AlphaMask;
pub use particle::{create_particles, KineticRanges, Particle};
pub use position::{bounds, Bounds, Position};
pub use prng::{RandomSource, Xorshift64};
pub use raster::{rasterize, BlockSurface, TextSurface};
pub use retarget::retarget;
pub use scene::Scene;
pub use state::{CanvasSize, Frame, ResizeOutcome, SwarmField};

pub use glam::DVec2;
