//! Point-ring generation and smoothing.

pub mod generator;
