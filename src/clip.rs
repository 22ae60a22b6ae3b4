//! Closing the diagram once the sweep is done: open edges are extended past the domain,
//! twin half-edges are joined, every edge is clipped to the square and the sides of the
//! square are cut into boundary segments owned by the nearest site.

use crate::bounds::{Domain, Side};
use crate::geometry::{Edge, Point, Segment, Site};
use tracing::warn;

/// Gives every edge without an end one far enough along its direction to leave the domain.
///
/// Returns the number of edges that were finished this way.
pub fn finish_edges(edges: &mut [Edge], domain: &Domain) -> usize {
    let center = domain.center();
    let reach = 2.0 * domain.width();
    let mut finished = 0;
    for edge in edges.iter_mut().filter(|e| e.end.is_none()) {
        let len = edge.direction.x.hypot(edge.direction.y);
        if len == 0.0 || !len.is_finite() {
            warn!(start = ?edge.start, left = edge.left, right = edge.right, "edge without direction");
            edge.end = Some(edge.start);
        } else {
            let t = (edge.start.distance(center) + reach) / len;
            edge.end = Some(Point::new(
                edge.start.x + edge.direction.x * t,
                edge.start.y + edge.direction.y * t,
            ));
        }
        finished += 1;
    }
    finished
}

/// Joins each pair of half-edges born at one site event into a single edge.
///
/// The reported half of the pair takes the far end of its twin as its start, so that it
/// spans the whole bisector piece. The twin itself is not part of the output.
pub fn join_twins(edges: &mut [Edge], reported: &[usize]) {
    for &e in reported {
        if let Some(twin) = edges[e].neighbour {
            if let Some(end) = edges[twin].end {
                edges[e].start = end;
            }
        }
    }
}

/// Clips the segment `a`-`b` to the domain (Liang-Barsky). Endpoints are snapped onto the
/// sides they touch.
pub fn clip_segment(a: Point, b: Point, domain: &Domain) -> Option<(Point, Point)> {
    let w = domain.width();
    let tol = domain.tolerance();
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let p = [-dx, dx, -dy, dy];
    let q = [a.x, w - a.x, a.y, w - a.y];

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (&p, &q) in p.iter().zip(q.iter()) {
        if p == 0.0 {
            if q < -tol {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let start = domain.snap(Point::new(a.x + t0 * dx, a.y + t0 * dy));
    let end = domain.snap(Point::new(a.x + t1 * dx, a.y + t1 * dy));
    Some((start, end))
}

/// Clips the reported edges to the domain, dropping those outside it or collapsed to a point.
pub fn clip_edges(edges: &[Edge], reported: &[usize], domain: &Domain) -> Vec<Segment> {
    let tol = domain.tolerance();
    reported
        .iter()
        .filter_map(|&e| {
            let edge = &edges[e];
            let end = edge.end?;
            let (start, end) = clip_segment(edge.start, end, domain)?;
            if start.approx_eq(end, tol) {
                return None;
            }
            Some(Segment {
                start,
                end,
                left: edge.left as i32,
                right: edge.right as i32,
            })
        })
        .collect()
}

/// Cuts the four sides of the domain at every clipped edge end lying on them.
///
/// Each piece gets the side ID on its right and the site nearest to its midpoint on its
/// left, which closes the polygon of every cell touching the boundary.
pub fn boundary_segments(segments: &[Segment], sites: &[Site], domain: &Domain) -> Vec<Segment> {
    let w = domain.width();
    let tol = domain.tolerance();
    let mut boundary = Vec::new();

    for side in Side::ALL {
        let (first, last) = side.corners(w);
        let mut stops: Vec<Point> = vec![first, last];
        for s in segments {
            for p in [s.start, s.end] {
                if side.holds(p, w) {
                    stops.push(p);
                }
            }
        }
        stops.sort_by(|a, b| side.offset(*a).total_cmp(&side.offset(*b)));
        stops.dedup_by(|a, b| (side.offset(*a) - side.offset(*b)).abs() <= tol);
        // Dedup keeps the first of a run, the exact corner must close the side.
        if let Some(end) = stops.last_mut() {
            *end = last;
        }

        for pair in stops.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if start.approx_eq(end, tol) {
                continue;
            }
            let Some(owner) = nearest_site(sites, start.midpoint(end)) else {
                continue;
            };
            boundary.push(Segment {
                start,
                end,
                left: owner as i32,
                right: side.id(),
            });
        }
    }
    boundary
}

fn nearest_site(sites: &[Site], p: Point) -> Option<usize> {
    sites
        .iter()
        .map(|s| (s.id, s.point().distance_sq(p)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}
