//! Quadrilateral geometry over selected feature points.
//!
//! Selected features arrive in score order, not spatial order, so the
//! four points are first rewound into a simple (non-self-intersecting)
//! cycle by sorting around their centroid by polar angle. Area and
//! perimeter are then well-defined regardless of discovery order.

/// Euclidean distance between two plane points.
pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Sort points counter-clockwise around their centroid by polar angle.
///
/// Angle ties (centroid and two points collinear on the same side) are
/// broken by distance from the centroid, farther first, so the ordering
/// is a strict total order for distinct points.
pub fn order_around_centroid(points: &mut [[f64; 2]]) {
    if points.is_empty() {
        return;
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = points.iter().map(|p| p[1]).sum::<f64>() / n;

    points.sort_by(|a, b| {
        let angle_a = (a[1] - cy).atan2(a[0] - cx);
        let angle_b = (b[1] - cy).atan2(b[0] - cx);
        angle_a.total_cmp(&angle_b).then_with(|| {
            let da = distance(*a, [cx, cy]);
            let db = distance(*b, [cx, cy]);
            db.total_cmp(&da)
        })
    });
}

/// Closed-loop perimeter of a polygon given in cyclic vertex order.
///
/// Includes the closing edge from the last vertex back to the first.
/// Two points degenerate to twice their separation.
pub fn perimeter(points: &[[f64; 2]]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        total += distance(points[i], points[j]);
    }
    total
}

/// Shoelace area of a simple polygon given in cyclic vertex order.
///
/// The absolute value is taken so winding direction does not flip the
/// sign. Collinear input yields 0, which is a valid result.
pub fn shoelace_area(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        acc += points[i][0] * points[j][1] - points[j][0] * points[i][1];
    }
    acc.abs() * 0.5
}

/// A quadrilateral with vertices in canonical cyclic order and derived
/// measurements.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quadrilateral {
    /// Vertices ordered counter-clockwise around the centroid.
    pub vertices: [[f64; 2]; 4],
    /// Enclosed area; 0 for collinear vertices.
    pub area: f64,
    /// Closed-loop perimeter.
    pub perimeter: f64,
}

impl Quadrilateral {
    /// Build from four points in any order.
    pub fn from_points(mut points: [[f64; 2]; 4]) -> Self {
        order_around_centroid(&mut points);
        Self {
            vertices: points,
            area: shoelace_area(&points),
            perimeter: perimeter(&points),
        }
    }

    /// True when the four vertices are collinear (zero enclosed area).
    pub fn is_degenerate(&self) -> bool {
        self.area == 0.0
    }
}
