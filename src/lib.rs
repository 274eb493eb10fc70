//! Surface shading and debug-visualization pipeline.
//!
//! The per-invocation math (geometry transform, tangent-space construction,
//! material resolution, Blinn-Phong lighting and debug-vector instancing)
//! lives in [`shading`] and [`pipeline::shaders`]. It is driven by a software
//! rasterization host in [`core`] so every stage can be executed on the CPU,
//! while [`core::layout`] carries the GPU buffer layouts bit for bit.

pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;
pub mod shading;

pub use error::{Error, Result};
