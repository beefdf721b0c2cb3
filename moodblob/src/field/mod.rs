//! Per-point phase accumulators and the distortion terms built on them.

pub mod noise;
