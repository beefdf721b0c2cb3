use std::f64::consts::TAU;

use crate::field::noise::{DistortionParams, NoiseField, distortion};
use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::{BlobError, BlobResult};
use crate::shape::profile::ShapeProfile;

/// Smallest ring that still encloses an area.
pub const MIN_POINTS: usize = 3;

/// Inputs for one contour evaluation.
#[derive(Clone, Copy, Debug)]
pub struct ContourParams {
    pub center: Point,
    pub radius: f64,
    pub shape: ShapeProfile,
    pub time: f64,
    /// Phase shift applied to the distortion angle (not the silhouette), used by secondary layers.
    pub angle_offset: f64,
    pub distortion: DistortionParams,
}

/// Samples the silhouette at `field.len()` evenly spaced angles, in angle order.
pub fn generate(field: &NoiseField, params: &ContourParams) -> BlobResult<Vec<Point>> {
    let n = field.len();
    if n < MIN_POINTS {
        return Err(BlobError::config(format!(
            "contour needs at least {MIN_POINTS} points, got {n}"
        )));
    }

    let mut points = Vec::with_capacity(n);
    for (i, offset) in field.offsets().iter().enumerate() {
        let angle = (i as f64 / n as f64) * TAU;
        let unit = params.shape.sample(angle);
        let d = distortion(
            angle + params.angle_offset,
            params.time,
            *offset,
            &params.distortion,
        );
        points.push(Point::new(
            params.center.x + unit.x * (params.radius + d.dx),
            params.center.y + unit.y * (params.radius + d.dy),
        ));
    }
    Ok(points)
}

/// Closed piecewise-quadratic outline through the ring: every sample is a control point and the
/// midpoint to its successor is the on-curve anchor, so the loop closes with C0 continuity.
pub fn smooth_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let n = points.len();
    if n == 0 {
        return path;
    }

    path.move_to(points[n - 1].midpoint(points[0]));
    for i in 0..n {
        let curr = points[i];
        let next = points[(i + 1) % n];
        path.quad_to(curr, curr.midpoint(next));
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/contour/generator.rs"]
mod tests;
