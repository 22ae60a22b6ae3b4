use crate::algorithm::SpatialAlgorithm;
use crate::bounds::Domain;

/// Upper bound on bins per axis.
pub const MAX_RESOLUTION: usize = 256;

/// A spatial index based on a uniform grid over the square domain.
///
/// This structure divides the domain into `resolution x resolution` bins.
/// Lookups only visit the bins a search disc can reach.
pub struct AlgorithmGrid {
    /// Number of bins along each axis.
    pub grid_res: usize,
    /// Scale factor for a coordinate to grid index.
    pub grid_scale: f64,
    /// Maximum valid index along an axis.
    pub grid_limit: f64,
    /// The grid bins, each containing a list of site indices.
    pub grid_bins: Vec<Vec<usize>>,
    /// Map from site index to its current bin index.
    pub site_bin_ids: Vec<usize>,
}

impl AlgorithmGrid {
    /// Creates a new `AlgorithmGrid` with `resolution` bins per axis.
    pub fn new(resolution: usize, domain: &Domain) -> Self {
        let n = resolution.clamp(1, MAX_RESOLUTION);
        AlgorithmGrid {
            grid_res: n,
            grid_scale: (n as f64) / domain.width(),
            grid_limit: (n as f64) - 1e-5,
            grid_bins: vec![Vec::new(); n * n],
            site_bin_ids: Vec::new(),
        }
    }

    /// Picks bins about as wide as the search radius.
    pub fn for_radius(radius: f64, domain: &Domain) -> Self {
        let resolution = (domain.width() / radius).ceil();
        let resolution = if resolution.is_finite() { resolution as usize } else { 1 };
        Self::new(resolution, domain)
    }

    fn axis_index(&self, v: f64) -> usize {
        (v * self.grid_scale).clamp(0.0, self.grid_limit) as usize
    }

    /// Calculates the linear index of the bin corresponding to the given coordinates.
    pub fn get_bin_index(&self, x: f64, y: f64) -> usize {
        self.axis_index(x) + self.axis_index(y) * self.grid_res
    }
}

impl SpatialAlgorithm for AlgorithmGrid {
    fn set_sites(&mut self, points: &[[f64; 2]], _domain: &Domain) {
        self.grid_bins.iter_mut().for_each(|bin| bin.clear());
        self.site_bin_ids = Vec::with_capacity(points.len());

        for (i, p) in points.iter().enumerate() {
            let bin_idx = self.get_bin_index(p[0], p[1]);
            self.grid_bins[bin_idx].push(i);
            self.site_bin_ids.push(bin_idx);
        }
    }

    fn visit_within<F>(&self, points: &[[f64; 2]], index: usize, radius: f64, mut visitor: F)
    where
        F: FnMut(usize, f64),
    {
        let [px, py] = points[index];
        let radius_sq = radius * radius;
        let cell_size = 1.0 / self.grid_scale;

        let bin_idx = self.site_bin_ids[index];
        let idx_x = (bin_idx % self.grid_res) as isize;
        let idx_y = (bin_idx / self.grid_res) as isize;
        let reach = ((radius * self.grid_scale).ceil() as isize).min(self.grid_res as isize);

        // Bins whose nearest point lies at least this far away can be skipped.
        let min_dist = |d: isize| if d == 0 { 0.0 } else { (d.abs() - 1) as f64 * cell_size };

        for dy in -reach..=reach {
            let by = idx_y + dy;
            if by < 0 || by >= self.grid_res as isize {
                continue;
            }
            for dx in -reach..=reach {
                let bx = idx_x + dx;
                if bx < 0 || bx >= self.grid_res as isize {
                    continue;
                }
                let (mx, my) = (min_dist(dx), min_dist(dy));
                if mx * mx + my * my >= radius_sq {
                    continue;
                }

                let bin_index = (bx as usize) + (by as usize) * self.grid_res;
                for &j in &self.grid_bins[bin_index] {
                    if index == j {
                        continue;
                    }
                    let ox = points[j][0] - px;
                    let oy = points[j][1] - py;
                    let d2 = ox * ox + oy * oy;
                    if d2 < radius_sq {
                        visitor(j, d2);
                    }
                }
            }
        }
    }
}
