//! Core processing building blocks: crop geometry, border fills, resizing,
//! inpainting, denoising, and the per-image pipelines. These are internal
//! primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;
