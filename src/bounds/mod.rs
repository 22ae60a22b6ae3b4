use crate::error::DiagramError;
use crate::geometry::Point;

/// Relative tolerance for geometric comparisons. Scaled by the domain width.
pub const EPSILON: f64 = 1e-9;

/// Side ID for the left edge of the domain, it is negative to prevent conflicts with site IDs.
pub const SIDE_ID_LEFT: i32 = -1;
/// Side ID for the right edge of the domain, it is negative to prevent conflicts with site IDs.
pub const SIDE_ID_RIGHT: i32 = -2;
/// Side ID for the bottom edge of the domain, it is negative to prevent conflicts with site IDs.
pub const SIDE_ID_BOTTOM: i32 = -3;
/// Side ID for the top edge of the domain, it is negative to prevent conflicts with site IDs.
pub const SIDE_ID_TOP: i32 = -4;

/// Calculates the ID for a domain side based on the axis and direction.
///
/// The IDs start at -1 and decrease.
/// - Axis 0 (X) Min: -1
/// - Axis 0 (X) Max: -2
/// - Axis 1 (Y) Min: -3
/// - Axis 1 (Y) Max: -4
pub fn box_side(axis: usize, is_max: bool) -> i32 {
    -1 - (axis * 2 + if is_max { 1 } else { 0 }) as i32
}

/// One of the four sides of the square domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Bottom,
    Right,
    Top,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Right, Side::Top, Side::Left];

    pub fn id(self) -> i32 {
        match self {
            Side::Left => box_side(0, false),
            Side::Right => box_side(0, true),
            Side::Bottom => box_side(1, false),
            Side::Top => box_side(1, true),
        }
    }

    /// The two corners bounding this side, ordered by increasing offset.
    pub fn corners(self, width: f64) -> (Point, Point) {
        match self {
            Side::Bottom => (Point::new(0.0, 0.0), Point::new(width, 0.0)),
            Side::Right => (Point::new(width, 0.0), Point::new(width, width)),
            Side::Top => (Point::new(0.0, width), Point::new(width, width)),
            Side::Left => (Point::new(0.0, 0.0), Point::new(0.0, width)),
        }
    }

    /// Position of `p` along the side.
    pub fn offset(self, p: Point) -> f64 {
        match self {
            Side::Bottom | Side::Top => p.x,
            Side::Left | Side::Right => p.y,
        }
    }

    /// Exact test, points are snapped onto the sides before they are compared.
    pub fn holds(self, p: Point, width: f64) -> bool {
        match self {
            Side::Bottom => p.y == 0.0,
            Side::Top => p.y == width,
            Side::Left => p.x == 0.0,
            Side::Right => p.x == width,
        }
    }
}

/// The square domain `[0, width] x [0, width]` in which all sites live.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    width: f64,
}

impl Domain {
    pub fn new(width: f64) -> Result<Domain, DiagramError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(DiagramError::InvalidWidth(width));
        }
        Ok(Domain { width })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn area(&self) -> f64 {
        self.width * self.width
    }

    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.width * 0.5)
    }

    /// Absolute tolerance for this domain.
    pub fn tolerance(&self) -> f64 {
        EPSILON * self.width.max(1.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.width
    }

    /// Validates the coordinates of the site at `index`.
    pub fn check_site(&self, index: usize, x: f64, y: f64) -> Result<(), DiagramError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(DiagramError::NonFiniteSite { index });
        }
        if !self.contains(x, y) {
            return Err(DiagramError::SiteOutOfBounds { index, x, y });
        }
        Ok(())
    }

    pub fn corners(&self) -> [Point; 4] {
        let w = self.width;
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, w),
            Point::new(0.0, w),
        ]
    }

    pub fn is_corner(&self, p: Point) -> bool {
        (p.x == 0.0 || p.x == self.width) && (p.y == 0.0 || p.y == self.width)
    }

    /// Clamps `p` into the domain and pulls coordinates within tolerance of a side onto it.
    pub fn snap(&self, p: Point) -> Point {
        let tol = self.tolerance();
        let snap_axis = |v: f64| {
            let v = v.clamp(0.0, self.width);
            if v <= tol {
                0.0
            } else if self.width - v <= tol {
                self.width
            } else {
                v
            }
        };
        Point::new(snap_axis(p.x), snap_axis(p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_ids_are_distinct_and_negative() {
        let ids: Vec<i32> = Side::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![SIDE_ID_BOTTOM, SIDE_ID_RIGHT, SIDE_ID_TOP, SIDE_ID_LEFT]);
        assert!(ids.iter().all(|&id| id < 0));
    }

    #[test]
    fn test_domain_rejects_bad_width() {
        assert!(Domain::new(0.0).is_err());
        assert!(Domain::new(-3.0).is_err());
        assert!(Domain::new(f64::NAN).is_err());
        assert!(Domain::new(f64::INFINITY).is_err());
        assert_eq!(Domain::new(10.0).unwrap().area(), 100.0);
    }

    #[test]
    fn test_check_site() {
        let domain = Domain::new(10.0).unwrap();
        assert!(domain.check_site(0, 0.0, 10.0).is_ok());
        assert_eq!(domain.check_site(2, f64::NAN, 1.0), Err(DiagramError::NonFiniteSite { index: 2 }));
        assert_eq!(
            domain.check_site(5, 10.5, 1.0),
            Err(DiagramError::SiteOutOfBounds { index: 5, x: 10.5, y: 1.0 })
        );
    }

    #[test]
    fn test_snap_pulls_points_onto_sides() {
        let domain = Domain::new(100.0).unwrap();
        let p = domain.snap(Point::new(1e-12, 100.0 - 1e-12));
        assert_eq!(p, Point::new(0.0, 100.0));
        assert!(domain.is_corner(p));

        let q = domain.snap(Point::new(-5.0, 42.0));
        assert_eq!(q, Point::new(0.0, 42.0));
        assert!(Side::Left.holds(q, 100.0));
        assert!(!domain.is_corner(q));
    }
}
