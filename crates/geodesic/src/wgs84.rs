//! Vincenty's formulae on the WGS84 ellipsoid.
//!
//! Reference: T. Vincenty, "Direct and Inverse Solutions of Geodesics
//! on the Ellipsoid with Application of Nested Equations", Survey
//! Review XXIII (1975).

/// WGS84 semi-major axis (metres).
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const FLATTENING: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (metres).
pub const SEMI_MINOR_AXIS: f64 = SEMI_MAJOR_AXIS * (1.0 - FLATTENING);

const CONVERGENCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 200;

/// Solve the direct geodesic problem.
///
/// Projects the destination point from an origin (lon, lat) in
/// degrees, an initial bearing clockwise from north in degrees, and a
/// distance in metres. Returns (lon, lat) in degrees with longitude
/// normalized to [-180, 180].
pub fn forward(lon: f64, lat: f64, bearing_deg: f64, distance_m: f64) -> (f64, f64) {
    if distance_m == 0.0 {
        return (lon, lat);
    }

    let a = SEMI_MAJOR_AXIS;
    let b = SEMI_MINOR_AXIS;
    let f = FLATTENING;

    let alpha1 = bearing_deg.to_radians();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    let tan_u1 = (1.0 - f) * lat.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a =
        1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let base_sigma = distance_m / (b * big_a);
    let mut sigma = base_sigma;
    for _ in 0..MAX_ITERATIONS {
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let sin_sigma = sigma.sin();
        let cos_sigma = sigma.cos();
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
        let next = base_sigma + delta_sigma;
        let converged = (next - sigma).abs() < CONVERGENCE;
        sigma = next;
        if converged {
            break;
        }
    }
    let sin_sigma = sigma.sin();
    let cos_sigma = sigma.cos();
    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda =
        (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    (normalize_lon(lon + l.to_degrees()), lat2.to_degrees())
}

/// Solve the inverse geodesic problem: distance in metres between two
/// (lon, lat) points in degrees.
pub fn inverse(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let a = SEMI_MAJOR_AXIS;
    let b = SEMI_MINOR_AXIS;
    let f = FLATTENING;

    let big_l = (lon2 - lon1).to_radians();
    let tan_u1 = (1.0 - f) * lat1.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;
    let tan_u2 = (1.0 - f) * lat2.to_radians().tan();
    let cos_u2 = 1.0 / (1.0 + tan_u2 * tan_u2).sqrt();
    let sin_u2 = tan_u2 * cos_u2;

    let mut lambda = big_l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos_2sigma_m = 0.0;

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let t1 = cos_u2 * sin_lambda;
        let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (t1 * t1 + t2 * t2).sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return 0.0;
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            // cos_sq_alpha is zero only for equatorial lines
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let prev = lambda;
        lambda = big_l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
        if (lambda - prev).abs() < CONVERGENCE {
            break;
        }
    }

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a =
        1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    b * big_a * (sigma - delta_sigma)
}

fn normalize_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}
