//! Core types and utilities

pub mod vec3;

pub use vec3::Vec3;
