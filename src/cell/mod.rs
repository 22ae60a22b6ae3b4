use crate::bounds::{Domain, Side};
use crate::geometry::{self, Point, Segment};

/// The Voronoi region of one site, reconstructed from its unordered edge set.
#[derive(Clone, Debug)]
pub struct VoronoiCell {
    pub(crate) id: usize,
    pub(crate) site: Point,
    // Flat array of vertices [x, y, x, y, ...], counter-clockwise around the site
    pub(crate) vertices: Vec<f64>,
    // Neighbor ID for each edge. edge_neighbors[i] corresponds to edge starting at vertices[2*i]
    pub(crate) edge_neighbors: Vec<i32>,
    pub(crate) edges: Vec<Segment>,
    pub(crate) area: f64,
}

impl VoronoiCell {
    /// The cell of a lone site: the whole domain.
    pub fn whole_domain(id: usize, site: Point, domain: &Domain) -> VoronoiCell {
        let corners = domain.corners();
        let vertices = corners.iter().flat_map(|c| [c.x, c.y]).collect();
        let edge_neighbors = Side::ALL.iter().map(|s| s.id()).collect();
        let edges = corners
            .iter()
            .zip(corners.iter().cycle().skip(1))
            .zip(Side::ALL)
            .map(|((&start, &end), side)| Segment {
                start,
                end,
                left: id as i32,
                right: side.id(),
            })
            .collect();

        VoronoiCell {
            id,
            site,
            vertices,
            edge_neighbors,
            edges,
            area: domain.area(),
        }
    }

    /// Builds the cell of site `id` from the segments incident to it.
    ///
    /// Segment endpoints are reduced to a vertex list (duplicates dropped, domain corners kept
    /// even when they recur), sorted by angle around their mean and fanned from the first vertex
    /// into triangles whose areas come from Heron's formula.
    pub fn assemble(id: usize, site: Point, segments: Vec<Segment>, domain: &Domain) -> VoronoiCell {
        let tol = domain.tolerance();

        let mut edges: Vec<Segment> = Vec::with_capacity(segments.len());
        for s in segments {
            if !edges.iter().any(|e| e.same_endpoints(&s)) {
                edges.push(s);
            }
        }

        let mut points: Vec<Point> = Vec::with_capacity(edges.len() * 2);
        for p in edges.iter().flat_map(|e| [e.start, e.end]) {
            if domain.is_corner(p) || !points.iter().any(|q| q.approx_eq(p, tol)) {
                points.push(p);
            }
        }

        // The site may sit on the boundary, on a vertex even; the vertex mean of a convex
        // cell is always inside it.
        let pivot = mean(&points).unwrap_or(site);
        let angle = |p: &Point| (p.y - pivot.y).atan2(p.x - pivot.x);
        points.sort_by(|a, b| {
            angle(a)
                .total_cmp(&angle(b))
                .then(pivot.distance_sq(*a).total_cmp(&pivot.distance_sq(*b)))
        });

        let area = fan_area(&points);

        points.dedup();
        let edge_neighbors = match points.len() {
            0 | 1 => Vec::new(),
            n => (0..n)
                .map(|i| neighbor_across(&edges, id as i32, points[i], points[(i + 1) % n], tol))
                .collect(),
        };
        let vertices = points.iter().flat_map(|p| [p.x, p.y]).collect();

        VoronoiCell {
            id,
            site,
            vertices,
            edge_neighbors,
            edges,
            area,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn site(&self) -> [f64; 2] {
        [self.site.x, self.site.y]
    }

    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    pub fn edge_neighbors(&self) -> &[i32] {
        &self.edge_neighbors
    }

    /// The finished segments bounding this cell, each listed once.
    pub fn edges(&self) -> &[Segment] {
        &self.edges
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Site IDs of the adjacent cells, without the domain sides.
    pub fn neighbors(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .edge_neighbors
            .iter()
            .filter(|&&n| n >= 0)
            .map(|&n| n as usize)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 6
    }

    pub fn centroid(&self) -> [f64; 2] {
        let n = self.vertices.len() / 2;
        if n < 3 {
            return [self.site.x, self.site.y];
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut area = 0.0;

        for i in 0..n {
            let j = (i + 1) % n;
            let xi = self.vertices[i * 2];
            let yi = self.vertices[i * 2 + 1];
            let xj = self.vertices[j * 2];
            let yj = self.vertices[j * 2 + 1];

            let cross = xi * yj - xj * yi;
            area += cross;
            cx += (xi + xj) * cross;
            cy += (yi + yj) * cross;
        }

        if area.abs() < 1e-9 {
            return [self.site.x, self.site.y];
        }

        let factor = 1.0 / (3.0 * area);
        [cx * factor, cy * factor]
    }
}

fn mean(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Triangle fan from the first vertex, each triangle measured with Heron's formula.
fn fan_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let origin = points[0];
    points[1..]
        .windows(2)
        .map(|pair| {
            let (b, c) = (pair[0], pair[1]);
            geometry::heron(origin.distance(b), b.distance(c), c.distance(origin))
        })
        .sum()
}

/// The ID on the other side of the polygon side `a`-`b`.
fn neighbor_across(edges: &[Segment], id: i32, a: Point, b: Point, tol: f64) -> i32 {
    let matches = |e: &&Segment| {
        (e.start.approx_eq(a, tol) && e.end.approx_eq(b, tol))
            || (e.start.approx_eq(b, tol) && e.end.approx_eq(a, tol))
    };
    if let Some(e) = edges.iter().find(matches) {
        return e.other_side(id);
    }
    // No exact match: take the segment passing closest to the middle of the side.
    let mid = a.midpoint(b);
    edges
        .iter()
        .min_by(|x, y| {
            x.start
                .midpoint(x.end)
                .distance_sq(mid)
                .total_cmp(&y.start.midpoint(y.end).distance_sq(mid))
        })
        .map_or(id, |e| e.other_side(id))
}
