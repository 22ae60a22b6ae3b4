use crate::beachline::Beachline;
use crate::bounds::Domain;
use crate::cell::VoronoiCell;
use crate::clip;
use crate::error::DiagramError;
use crate::events::{Event, EventKind, EventQueue};
use crate::geometry::{Edge, Segment, Site};
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, trace};

/// Counters collected while building a diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Site events processed, one per site.
    pub site_events: usize,
    /// Circle events that removed an arc.
    pub circle_events: usize,
    /// Circle events popped after their arc had changed, skipped.
    pub stale_events: usize,
    /// Clipped edges between two sites.
    pub edges: usize,
    /// Segments synthesized along the domain sides.
    pub boundary_segments: usize,
}

/// The main container for building a Voronoi diagram of sites in a square domain.
///
/// This struct manages:
/// - The **domain** `[0, w] x [0, w]`.
/// - The **sites** that define the Voronoi cells.
/// - The **cells** and **edges** produced by the last call to [`Diagram::calculate`].
///
/// The sweep itself runs on one thread, cells are assembled in parallel afterwards.
pub struct Diagram {
    domain: Domain,
    sites: Vec<Site>,
    edges: Vec<Segment>,
    cells: Vec<VoronoiCell>,
    stats: SweepStats,
}

impl Diagram {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            sites: Vec::new(),
            edges: Vec::new(),
            cells: Vec::new(),
            stats: SweepStats::default(),
        }
    }

    /// Sets the sites from a flat `[x, y, x, y, ...]` slice.
    pub fn set_sites(&mut self, coordinates: &[f64]) -> Result<(), DiagramError> {
        if coordinates.len() % 2 != 0 {
            return Err(DiagramError::MalformedCoordinates(coordinates.len()));
        }
        let points: Vec<[f64; 2]> = coordinates.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
        self.set_points(&points)
    }

    /// Sets the sites, rejecting non-finite, out of domain and coincident positions.
    ///
    /// On error the previous sites are kept.
    pub fn set_points(&mut self, points: &[[f64; 2]]) -> Result<(), DiagramError> {
        let mut seen: HashMap<(u64, u64), usize> = HashMap::with_capacity(points.len());
        let mut sites = Vec::with_capacity(points.len());
        for (i, &[x, y]) in points.iter().enumerate() {
            self.domain.check_site(i, x, y)?;
            if let Some(&first) = seen.get(&position_key(x, y)) {
                return Err(DiagramError::DuplicateSite { first, second: i });
            }
            seen.insert(position_key(x, y), i);
            sites.push(Site::new(i, x, y));
        }
        self.sites = sites;
        self.clear_results();
        Ok(())
    }

    /// Generates `count` distinct random sites within the domain.
    pub fn random_sites(&mut self, count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let w = self.domain.width();
        let mut seen = HashSet::with_capacity(count);
        let mut sites = Vec::with_capacity(count);
        while sites.len() < count {
            let x = rng.r#gen::<f64>() * w;
            let y = rng.r#gen::<f64>() * w;
            if seen.insert(position_key(x, y)) {
                sites.push(Site::new(sites.len(), x, y));
            }
        }
        self.sites = sites;
        self.clear_results();
    }

    fn clear_results(&mut self) {
        self.edges.clear();
        self.cells.clear();
        self.stats = SweepStats::default();
    }

    /// Builds the diagram of the current sites.
    pub fn calculate(&mut self) {
        self.clear_results();
        let domain = self.domain;
        let sites = &self.sites;

        match sites.len() {
            0 => return,
            1 => {
                let cell = VoronoiCell::whole_domain(0, sites[0].point(), &domain);
                self.stats.site_events = 1;
                self.stats.boundary_segments = cell.edges().len();
                self.edges = cell.edges().to_vec();
                self.cells = vec![cell];
                return;
            }
            _ => {}
        }

        let (mut edges, reported, mut stats) = run_sweep(sites, &domain, |_| {});

        let unfinished = clip::finish_edges(&mut edges, &domain);
        clip::join_twins(&mut edges, &reported);
        let mut segments = clip::clip_edges(&edges, &reported, &domain);
        let boundary = clip::boundary_segments(&segments, sites, &domain);
        stats.edges = segments.len();
        stats.boundary_segments = boundary.len();
        segments.extend(boundary);

        let mut incident: Vec<Vec<Segment>> = vec![Vec::new(); sites.len()];
        for s in &segments {
            for id in [s.left, s.right] {
                if id >= 0 {
                    incident[id as usize].push(*s);
                }
            }
        }

        self.cells = incident
            .into_par_iter()
            .enumerate()
            .map(|(i, segments)| VoronoiCell::assemble(i, sites[i].point(), segments, &domain))
            .collect();

        debug!(
            sites = sites.len(),
            site_events = stats.site_events,
            circle_events = stats.circle_events,
            stale_events = stats.stale_events,
            unfinished,
            edges = stats.edges,
            boundary_segments = stats.boundary_segments,
            "voronoi diagram built"
        );
        self.edges = segments;
        self.stats = stats;
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn count_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn get_site(&self, index: usize) -> Option<[f64; 2]> {
        self.sites.get(index).map(|s| [s.x, s.y])
    }

    pub fn sites(&self) -> Vec<f64> {
        self.sites.iter().flat_map(|s| [s.x, s.y]).collect()
    }

    pub fn count_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn get_cell(&self, index: usize) -> Option<&VoronoiCell> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    /// All segments of the diagram: clipped edges between sites followed by the boundary
    /// segments along the domain sides.
    pub fn edges(&self) -> &[Segment] {
        &self.edges
    }

    /// Cell areas, index-aligned with the sites.
    pub fn areas(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.area()).collect()
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }
}

/// Bit pattern of a position, with `-0.0` folded onto `0.0`.
fn position_key(x: f64, y: f64) -> (u64, u64) {
    ((x + 0.0).to_bits(), (y + 0.0).to_bits())
}

/// Runs Fortune's sweep over `sites`, calling `on_event` for every event that is applied.
///
/// Returns the edge arena, the indices of the edges making up the diagram and the event
/// counters.
fn run_sweep(
    sites: &[Site],
    domain: &Domain,
    mut on_event: impl FnMut(&Event),
) -> (Vec<Edge>, Vec<usize>, SweepStats) {
    let mut stats = SweepStats::default();
    let mut queue = EventQueue::with_capacity(sites.len() * 2);
    for (i, site) in sites.iter().enumerate() {
        queue.push(Event::site(i, site));
    }

    let mut beachline = Beachline::new(sites, domain.width(), domain.tolerance());
    while let Some(event) = queue.pop() {
        match event.kind {
            EventKind::Site(index) => {
                trace!(index, y = event.y, "site event");
                on_event(&event);
                beachline.insert(index, &mut queue);
                stats.site_events += 1;
            }
            EventKind::Circle(circle) => {
                if !beachline.is_live(circle.arc, circle.generation) {
                    stats.stale_events += 1;
                    continue;
                }
                trace!(x = circle.center.x, y = circle.center.y, sweep = event.y, "circle event");
                on_event(&event);
                beachline.remove(event.y, &circle, &mut queue);
                stats.circle_events += 1;
            }
        }
    }

    let (edges, reported) = beachline.into_parts();
    (edges, reported, stats)
}

/// Builds the diagram of `points` in `[0, width]²` and returns the cell areas, index-aligned
/// with the input.
pub fn voronoi_areas(width: f64, points: &[[f64; 2]]) -> Result<Vec<f64>, DiagramError> {
    let mut diagram = Diagram::new(Domain::new(width)?);
    diagram.set_points(points)?;
    diagram.calculate();
    Ok(diagram.areas())
}

/// Like [`voronoi_areas`], keyed by an identity carried alongside each point.
pub fn voronoi_areas_by_key<K, I>(width: f64, items: I) -> Result<HashMap<K, f64>, DiagramError>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, [f64; 2])>,
{
    let (keys, points): (Vec<K>, Vec<[f64; 2]>) = items.into_iter().unzip();
    let areas = voronoi_areas(width, &points)?;
    Ok(keys.into_iter().zip(areas).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram(width: f64, points: &[[f64; 2]]) -> Diagram {
        let mut diagram = Diagram::new(Domain::new(width).unwrap());
        diagram.set_points(points).unwrap();
        diagram.calculate();
        diagram
    }

    #[test]
    fn test_sweep_is_monotone() {
        let mut d = Diagram::new(Domain::new(100.0).unwrap());
        d.random_sites(300, 42);
        let mut last = f64::INFINITY;
        let mut sites = 0;
        let (_, _, stats) = run_sweep(&d.sites, &d.domain, |event| {
            assert!(event.y <= last, "event at {} after {}", event.y, last);
            last = event.y;
            if event.is_site() {
                sites += 1;
            }
        });
        assert_eq!(sites, 300);
        assert_eq!(stats.site_events, 300);
        assert!(stats.circle_events > 0);
    }

    #[test]
    fn test_stale_events_are_counted() {
        let d = diagram(100.0, &[[25.0, 25.0], [25.0, 75.0], [75.0, 25.0], [75.0, 75.0]]);
        let stats = d.stats();
        assert_eq!(stats.site_events, 4);
        assert_eq!(stats.circle_events, 2);
        assert_eq!(stats.stale_events, 1);
        assert_eq!(d.count_cells(), 4);
    }

    #[test]
    fn test_empty_and_single() {
        let empty = diagram(10.0, &[]);
        assert_eq!(empty.count_cells(), 0);
        assert!(empty.areas().is_empty());

        let single = diagram(10.0, &[[2.0, 7.0]]);
        assert_eq!(single.areas(), vec![100.0]);
        assert_eq!(single.edges().len(), 4);
        assert_eq!(single.get_cell(0).unwrap().id(), 0);
    }

    #[test]
    fn test_set_sites_validation() {
        let mut d = Diagram::new(Domain::new(10.0).unwrap());
        assert_eq!(d.set_sites(&[1.0, 2.0, 3.0]), Err(DiagramError::MalformedCoordinates(3)));
        assert_eq!(
            d.set_sites(&[1.0, 2.0, 3.0, 4.0, 1.0, 2.0]),
            Err(DiagramError::DuplicateSite { first: 0, second: 2 })
        );
        assert_eq!(
            d.set_sites(&[0.0, 5.0, -0.0, 5.0]),
            Err(DiagramError::DuplicateSite { first: 0, second: 1 })
        );
        assert!(d.set_sites(&[1.0, 2.0, 3.0, 4.0]).is_ok());
        assert!(d.set_sites(&[f64::NAN, 2.0]).is_err());
        // Failed calls keep the previous sites.
        assert_eq!(d.count_sites(), 2);
        assert_eq!(d.get_site(1), Some([3.0, 4.0]));
        assert_eq!(d.sites(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_random_sites_are_seeded() {
        let mut a = Diagram::new(Domain::new(50.0).unwrap());
        let mut b = Diagram::new(Domain::new(50.0).unwrap());
        a.random_sites(20, 9);
        b.random_sites(20, 9);
        assert_eq!(a.sites(), b.sites());
        assert_eq!(a.count_sites(), 20);
        assert!(a.sites().iter().all(|&v| (0.0..=50.0).contains(&v)));
    }
}
