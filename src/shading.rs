//! Shading stages shared by the lit pipeline variants.

pub mod config;
pub mod lighting;
pub mod material;
pub mod tangent_space;
