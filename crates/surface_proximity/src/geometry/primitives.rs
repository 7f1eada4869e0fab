//! Closed-form geometric primitives used by the collectors.
//!
//! All distances are Euclidean. Degenerate input never aborts a build: a
//! zero-area triangle or a non-finite result reports `f64::INFINITY`, which
//! no depth test or nearest-face comparison will ever accept.

use glam::DVec3;

/// Triangles with a doubled area below this are treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-300;

/// Closest point to `p` on triangle `[a, b, c]`.
///
/// Voronoi-region walk (Ericson, Real-Time Collision Detection 5.1.5):
/// vertex regions first, then edge regions, then the face interior.
pub fn closest_point_on_triangle(p: DVec3, [a, b, c]: [DVec3; 3]) -> DVec3 {
  let ab = b - a;
  let ac = c - a;
  let ap = p - a;

  let d1 = ab.dot(ap);
  let d2 = ac.dot(ap);
  if d1 <= 0.0 && d2 <= 0.0 {
    return a;
  }

  let bp = p - b;
  let d3 = ab.dot(bp);
  let d4 = ac.dot(bp);
  if d3 >= 0.0 && d4 <= d3 {
    return b;
  }

  let vc = d1 * d4 - d3 * d2;
  if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
    let v = d1 / (d1 - d3);
    return a + ab * v;
  }

  let cp = p - c;
  let d5 = ab.dot(cp);
  let d6 = ac.dot(cp);
  if d6 >= 0.0 && d5 <= d6 {
    return c;
  }

  let vb = d5 * d2 - d1 * d6;
  if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
    let w = d2 / (d2 - d6);
    return a + ac * w;
  }

  let va = d3 * d6 - d5 * d4;
  if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
    let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
    return b + (c - b) * w;
  }

  let denom = 1.0 / (va + vb + vc);
  let v = vb * denom;
  let w = vc * denom;
  a + ab * v + ac * w
}

/// Distance from `p` to triangle `tri`, or infinity for degenerate input.
#[inline]
pub fn point_triangle_distance(p: DVec3, tri: [DVec3; 3]) -> f64 {
  let doubled_area = (tri[1] - tri[0]).cross(tri[2] - tri[0]).length();
  if !doubled_area.is_finite() || doubled_area <= DEGENERATE_AREA {
    return f64::INFINITY;
  }

  let dist = (closest_point_on_triangle(p, tri) - p).length();
  if dist.is_finite() {
    dist
  } else {
    f64::INFINITY
  }
}

/// Minimum distance from any vertex of `tet` to triangle `tri`.
#[inline]
pub fn min_vertex_distance(tet: &[DVec3; 4], tri: [DVec3; 3]) -> f64 {
  tet
    .iter()
    .map(|&v| point_triangle_distance(v, tri))
    .fold(f64::INFINITY, f64::min)
}

/// True if some vertex of `tet` lies within `depth` of triangle `tri`.
#[inline]
pub fn is_within_depth(tet: &[DVec3; 4], tri: [DVec3; 3], depth: f64) -> bool {
  min_vertex_distance(tet, tri) <= depth
}

/// Fill `out` with the barycentric sub-grid of `tet` for subdivision `d`.
///
/// Point `(i, j, k, l)` with `i + j + k + l = d` sits at
/// `(i·v0 + j·v1 + k·v2 + l·v3) / d`, giving `(d+1)(d+2)(d+3)/6` points.
/// `d = 0` yields the centroid. Returns the number of points written.
pub fn sub_grid_points(tet: &[DVec3; 4], subdivision: u32, out: &mut Vec<DVec3>) -> usize {
  out.clear();

  if subdivision == 0 {
    out.push((tet[0] + tet[1] + tet[2] + tet[3]) * 0.25);
    return 1;
  }

  let d = subdivision;
  let inv = 1.0 / d as f64;
  for i in 0..=d {
    for j in 0..=(d - i) {
      for k in 0..=(d - i - j) {
        let l = d - i - j - k;
        let point =
          (tet[0] * i as f64 + tet[1] * j as f64 + tet[2] * k as f64 + tet[3] * l as f64) * inv;
        out.push(point);
      }
    }
  }

  out.len()
}

#[cfg(test)]
#[path = "primitives_test.rs"]
mod primitives_test;
