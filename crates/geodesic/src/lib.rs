//! Ellipsoidal geodesic computations on the WGS84 reference ellipsoid.
//!
//! Implements the direct (forward) and inverse geodesic problems from
//! scratch: project a destination from origin, bearing, and distance,
//! and recover the distance between two points.

pub mod wgs84;

pub use wgs84::{forward, inverse, FLATTENING, SEMI_MAJOR_AXIS, SEMI_MINOR_AXIS};
