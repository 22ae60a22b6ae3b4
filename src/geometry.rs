//! Geometric primitives of the sweep: points, sites, breakpoint edges and the parabola
//! algebra used to locate arcs on the beachline.

/// A point in the plane.
///
/// Whether a point exists at all is carried by the position it is stored in: an edge whose
/// end has not been computed yet holds `None`, and [`intersect`] returns `None` when two
/// edges have no admissible intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn approx_eq(self, other: Point, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol && (self.y - other.y).abs() <= tol
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// A generator of the diagram.
///
/// `id` is the index of the owning agent in the caller's input, it doubles as the
/// neighbour ID reported by cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub x: f64,
    pub y: f64,
    pub id: usize,
}

impl Site {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { x, y, id }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A half-edge traced by a breakpoint of the beachline.
///
/// The edge lies on the bisector of its `left` and `right` sites. `direction` is the
/// direction the breakpoint travels in while the sweep line moves down, `slope` and
/// `intercept` describe the supporting line `y = slope * x + intercept` (the slope is
/// infinite for vertical edges).
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Option<Point>,
    pub direction: Point,
    pub slope: f64,
    pub intercept: f64,
    pub left: usize,
    pub right: usize,
    /// The opposite half of a pair of edges born at the same site event.
    pub neighbour: Option<usize>,
    /// Set for bisectors of sites in the topmost row. Their breakpoint comes down from
    /// infinity, so `start` is only where the edge enters the domain.
    pub from_above: bool,
}

impl Edge {
    pub fn new(start: Point, left: &Site, right: &Site) -> Edge {
        let slope = (right.x - left.x) / (left.y - right.y);
        Edge {
            start,
            end: None,
            direction: Point::new(right.y - left.y, -(right.x - left.x)),
            slope,
            intercept: start.y - slope * start.x,
            left: left.id,
            right: right.id,
            neighbour: None,
            from_above: false,
        }
    }

    /// The edge between two sites of the topmost row, entering the domain at `start`.
    pub fn from_above(start: Point, left: &Site, right: &Site) -> Edge {
        Edge {
            from_above: true,
            ..Edge::new(start, left, right)
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.direction.x == 0.0
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.end.is_some()
    }

    /// True if `p` lies behind the start of the edge, i.e. the breakpoint moves away from it.
    fn is_behind(&self, p: Point, tol: f64) -> bool {
        if self.from_above {
            return false;
        }
        let behind = |delta: f64, dir: f64| dir != 0.0 && delta * dir.signum() < -tol;
        behind(p.x - self.start.x, self.direction.x) || behind(p.y - self.start.y, self.direction.y)
    }
}

/// A finished, clipped segment of the diagram.
///
/// `left` and `right` are the IDs on either side: a site index, or a negative side ID for
/// segments synthesized along the domain boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub left: i32,
    pub right: i32,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The ID across this segment as seen from `id`.
    pub fn other_side(&self, id: i32) -> i32 {
        if self.left == id { self.right } else { self.left }
    }

    pub fn same_endpoints(&self, other: &Segment) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

/// Height at `x` of the parabola with focus `site` and directrix `y = directrix`.
pub fn parabola_y(site: Point, directrix: f64, x: f64) -> f64 {
    let dp = 2.0 * (site.y - directrix);
    (x - site.x) * (x - site.x) / dp + (site.y + directrix) * 0.5
}

/// X coordinate of the breakpoint between the arc of `left` and the arc of `right`.
///
/// Both parabolas are written as `a x^2 + b x + c` and subtracted; of the two roots the one
/// matching the left/right order of the arcs is returned. A focus lying on the directrix
/// degenerates into a vertical ray at its own x.
pub fn breakpoint_x(left: Point, right: Point, directrix: f64) -> f64 {
    let dl = left.y - directrix;
    let dr = right.y - directrix;
    if dl == 0.0 && dr == 0.0 {
        return (left.x + right.x) * 0.5;
    }
    if dl == 0.0 {
        return left.x;
    }
    if dr == 0.0 {
        return right.x;
    }

    let a1 = 1.0 / (2.0 * dl);
    let b1 = -left.x / dl;
    let c1 = left.x * left.x / (2.0 * dl) + (left.y + directrix) * 0.5;

    let a2 = 1.0 / (2.0 * dr);
    let b2 = -right.x / dr;
    let c2 = right.x * right.x / (2.0 * dr) + (right.y + directrix) * 0.5;

    let a = a1 - a2;
    let b = b1 - b2;
    let c = c1 - c2;

    if a == 0.0 {
        // Equal focal distances, the parabolas differ by a shift only.
        return -c / b;
    }

    let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let x1 = (-b - disc) / (2.0 * a);
    let x2 = (-b + disc) / (2.0 * a);

    if left.y < right.y { x1.max(x2) } else { x1.min(x2) }
}

/// Intersection of the lines carrying `e1` and `e2`, if it lies ahead of both starts.
///
/// The forward test is applied on both axes of both edges, each against its own start
/// coordinate on that axis.
pub fn intersect(e1: &Edge, e2: &Edge, tol: f64) -> Option<Point> {
    let (x, y) = if e1.is_vertical() {
        if e2.is_vertical() {
            return None;
        }
        let x = e1.start.x;
        (x, e2.slope * x + e2.intercept)
    } else if e2.is_vertical() {
        let x = e2.start.x;
        (x, e1.slope * x + e1.intercept)
    } else {
        let ds = e1.slope - e2.slope;
        if ds == 0.0 {
            return None;
        }
        let x = (e2.intercept - e1.intercept) / ds;
        // Evaluate on the flatter line, steep lines amplify the error in x.
        let y = if e1.slope.abs() <= e2.slope.abs() {
            e1.slope * x + e1.intercept
        } else {
            e2.slope * x + e2.intercept
        };
        (x, y)
    };

    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let p = Point::new(x, y);
    if e1.is_behind(p, tol) || e2.is_behind(p, tol) {
        return None;
    }
    Some(p)
}

/// True if `a`, `b`, `c` make a clockwise turn.
pub fn turns_clockwise(a: Point, b: Point, c: Point) -> bool {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x) < 0.0
}

/// Area of a triangle from its side lengths.
pub fn heron(a: f64, b: f64, c: f64) -> f64 {
    let s = (a + b + c) * 0.5;
    (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_parabola_equidistant() {
        let site = Point::new(3.0, 8.0);
        let directrix = 2.0;
        for x in [-4.0, 0.0, 3.0, 7.5] {
            let y = parabola_y(site, directrix, x);
            let to_focus = Point::new(x, y).distance(site);
            let to_line = y - directrix;
            assert!((to_focus - to_line).abs() < 1e-9, "x = {}: {} vs {}", x, to_focus, to_line);
        }
    }

    #[test]
    fn test_breakpoint_lies_on_both_parabolas() {
        let left = Point::new(2.0, 9.0);
        let right = Point::new(6.0, 5.0);
        let directrix = 1.0;
        let x = breakpoint_x(left, right, directrix);
        let yl = parabola_y(left, directrix, x);
        let yr = parabola_y(right, directrix, x);
        assert!((yl - yr).abs() < 1e-9);

        // Swapping the arcs selects the other root.
        let x_swapped = breakpoint_x(right, left, directrix);
        assert!((x - x_swapped).abs() > 1e-6);
        assert!((parabola_y(left, directrix, x_swapped) - parabola_y(right, directrix, x_swapped)).abs() < 1e-9);
    }

    #[test]
    fn test_breakpoint_equal_heights_is_midpoint() {
        let x = breakpoint_x(Point::new(25.0, 75.0), Point::new(75.0, 75.0), 25.0);
        assert!((x - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_breakpoint_focus_on_directrix() {
        let x = breakpoint_x(Point::new(10.0, 90.0), Point::new(30.0, 50.0), 50.0);
        assert_eq!(x, 30.0);
        let top = breakpoint_x(Point::new(10.0, 50.0), Point::new(30.0, 50.0), 50.0);
        assert_eq!(top, 20.0);
    }

    #[test]
    fn test_edge_direction_and_line() {
        let left = Site::new(0, 20.0, 50.0);
        let right = Site::new(1, 80.0, 50.0);
        let edge = Edge::new(Point::new(50.0, 100.0), &left, &right);
        assert!(edge.is_vertical());
        assert!(edge.direction.y < 0.0, "breakpoint of a level pair moves down");
        assert!(!edge.is_finished());

        let lower = Site::new(2, 50.0, 0.0);
        let tilted = Edge::new(left.point().midpoint(lower.point()), &left, &lower);
        // Every point of the supporting line is equidistant from both sites.
        let p = Point::new(10.0, tilted.slope * 10.0 + tilted.intercept);
        assert!((p.distance(left.point()) - p.distance(lower.point())).abs() < 1e-9);
    }

    #[test]
    fn test_intersect_vertical_and_horizontal() {
        // Level pair above, breakpoint travels down x = 50.
        let v = Edge::new(Point::new(50.0, 100.0), &Site::new(0, 25.0, 75.0), &Site::new(1, 75.0, 75.0));
        // Stacked pair, breakpoint travels right along y = 50.
        let h = Edge::new(Point::new(25.0, 50.0), &Site::new(2, 25.0, 25.0), &Site::new(0, 25.0, 75.0));
        assert_eq!(h.direction.y, 0.0);
        let p = intersect(&h, &v, TOL).expect("converging edges must meet");
        assert!((p.x - 50.0).abs() < 1e-12 && (p.y - 50.0).abs() < 1e-12);

        // The twin travelling left never reaches x = 50.
        let away = Edge::new(Point::new(25.0, 50.0), &Site::new(0, 25.0, 75.0), &Site::new(2, 25.0, 25.0));
        assert!(intersect(&away, &v, TOL).is_none());
    }

    #[test]
    fn test_intersect_parallel_is_none() {
        let a = Edge::new(Point::new(0.0, 0.0), &Site::new(0, 0.0, 10.0), &Site::new(1, 10.0, 0.0));
        let b = Edge::new(Point::new(5.0, 0.0), &Site::new(0, 0.0, 10.0), &Site::new(1, 10.0, 0.0));
        assert!(intersect(&a, &b, TOL).is_none());
        let v1 = Edge::new(Point::new(1.0, 0.0), &Site::new(0, 0.0, 1.0), &Site::new(1, 2.0, 1.0));
        let v2 = Edge::new(Point::new(3.0, 0.0), &Site::new(0, 2.0, 1.0), &Site::new(1, 4.0, 1.0));
        assert!(intersect(&v1, &v2, TOL).is_none());
    }

    #[test]
    fn test_intersect_checks_y_against_start_y() {
        // e1: y = 50 travelling left from (100, 50).
        let e1 = Edge::new(Point::new(100.0, 50.0), &Site::new(0, 60.0, 60.0), &Site::new(1, 60.0, 40.0));
        // e2: y = -4x + 330 travelling up-left from (80, 10).
        let e2 = Edge::new(Point::new(80.0, 10.0), &Site::new(2, 90.0, 5.0), &Site::new(3, 70.0, 0.0));
        assert_eq!(e1.direction, Point::new(-20.0, 0.0));
        assert_eq!(e2.direction, Point::new(-5.0, 20.0));

        // The meeting point (70, 50) is ahead of both starts. Comparing its y with the
        // start x of e2 (50 - 80 < 0 against an upward direction) would wrongly reject it.
        let p = intersect(&e1, &e2, TOL).expect("meeting point is ahead of both edges");
        assert!((p.x - 70.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_row_edge_meets_above_its_start() {
        let left = Site::new(0, 50.0, 95.0);
        let right = Site::new(1, 90.0, 95.0);
        let lower = Site::new(2, 55.0, 90.0);
        let start = Point::new(70.0, 100.0);
        let climbing = Edge::new(Point::new(55.0, 95.0), &lower, &left);
        assert_eq!(climbing.direction, Point::new(5.0, 5.0));

        // The vertex (70, 110) is above where the bisector enters the domain.
        let clipped = Edge::new(start, &left, &right);
        assert!(intersect(&clipped, &climbing, TOL).is_none());

        let level = Edge::from_above(start, &left, &right);
        assert_eq!(level.start, start);
        let p = intersect(&level, &climbing, TOL).expect("the breakpoint comes from above");
        assert!(p.approx_eq(Point::new(70.0, 110.0), 1e-9), "vertex {:?}", p);
    }

    #[test]
    fn test_turns_clockwise() {
        let (a, b, c) = (Point::new(0.0, 10.0), Point::new(5.0, 20.0), Point::new(10.0, 10.0));
        assert!(turns_clockwise(a, b, c));
        assert!(!turns_clockwise(c, b, a));
        assert!(!turns_clockwise(a, Point::new(5.0, 10.0), c));
    }

    #[test]
    fn test_heron() {
        assert!((heron(3.0, 4.0, 5.0) - 6.0).abs() < 1e-12);
        assert_eq!(heron(0.0, 5.0, 5.0), 0.0);
        // Rounding can push a flat triangle slightly negative.
        assert_eq!(heron(1.0, 2.0, 3.0 + 1e-16), 0.0);
    }

    #[test]
    fn test_segment_endpoints() {
        let a = Segment { start: Point::new(0.0, 0.0), end: Point::new(1.0, 1.0), left: 0, right: 1 };
        let b = Segment { start: Point::new(1.0, 1.0), end: Point::new(0.0, 0.0), left: 1, right: 0 };
        assert!(a.same_endpoints(&b));
        assert_eq!(a.other_side(0), 1);
        assert_eq!(a.other_side(1), 0);
    }
}
