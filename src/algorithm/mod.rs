use crate::bounds::Domain;

pub mod grid;

/// Trait defining a spatial acceleration structure over the sites of a domain.
pub trait SpatialAlgorithm: Send + Sync {
    /// Rebuild the index with new sites.
    fn set_sites(&mut self, points: &[[f64; 2]], domain: &Domain);

    /// Visit the sites strictly closer than `radius` to the site at `index`.
    ///
    /// # Arguments
    /// * `points` - The full list of sites (needed to retrieve neighbor positions).
    /// * `index` - The index of the site we are processing.
    /// * `radius` - The search radius.
    /// * `visitor` - A closure called for each neighbor within the radius. It receives the
    ///               neighbor's index and its squared distance.
    fn visit_within<F>(&self, points: &[[f64; 2]], index: usize, radius: f64, visitor: F)
    where
        F: FnMut(usize, f64);
}
