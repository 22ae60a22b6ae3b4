//! Local density estimates for a population of point agents.
//!
//! Two estimators are offered: the inverse area of each agent's Voronoi cell, and the number
//! of other agents within a fixed search radius. Larger values mean denser surroundings for
//! both, so either can feed [`rank_by_density`].

use crate::algorithm::SpatialAlgorithm;
use crate::algorithm::grid::AlgorithmGrid;
use crate::bounds::Domain;
use crate::diagram::voronoi_areas;
use crate::error::DiagramError;
use rayon::prelude::*;

/// Added to a cell area before inverting it, so that empty cells stay finite.
pub const AREA_OFFSET: f64 = 0.1;

/// How the density around each agent is estimated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DensityStrategy {
    /// `1 / (area + 0.1)` of the agent's Voronoi cell.
    #[default]
    Voronoi,
    /// Number of other agents strictly closer than `search_radius`.
    DistanceCount { search_radius: f64 },
}

impl DensityStrategy {
    /// Estimates the density around every point of `points` in `[0, width]²`, index-aligned
    /// with the input.
    pub fn estimate(&self, width: f64, points: &[[f64; 2]]) -> Result<Vec<f64>, DiagramError> {
        match *self {
            DensityStrategy::Voronoi => {
                let areas = voronoi_areas(width, points)?;
                Ok(areas.into_iter().map(density_from_area).collect())
            }
            DensityStrategy::DistanceCount { search_radius } => {
                let counts = count_within(width, points, search_radius)?;
                Ok(counts.into_iter().map(|c| c as f64).collect())
            }
        }
    }
}

pub fn density_from_area(area: f64) -> f64 {
    1.0 / (area + AREA_OFFSET)
}

/// For each point, the number of other points strictly closer than `radius`.
///
/// Coincident points are allowed here and count as neighbours of each other.
pub fn count_within(width: f64, points: &[[f64; 2]], radius: f64) -> Result<Vec<usize>, DiagramError> {
    let domain = Domain::new(width)?;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(DiagramError::InvalidSearchRadius(radius));
    }
    for (i, p) in points.iter().enumerate() {
        domain.check_site(i, p[0], p[1])?;
    }

    let mut grid = AlgorithmGrid::for_radius(radius, &domain);
    grid.set_sites(points, &domain);

    Ok((0..points.len())
        .into_par_iter()
        .map(|i| {
            let mut count = 0;
            grid.visit_within(points, i, radius, |_, _| count += 1);
            count
        })
        .collect())
}

/// Site indices ordered from the densest to the sparsest. Equal densities keep input order.
pub fn rank_by_density(densities: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..densities.len()).collect();
    order.sort_by(|&a, &b| densities[b].total_cmp(&densities[a]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_from_area() {
        assert_eq!(density_from_area(0.0), 10.0);
        assert!(density_from_area(1.0) > density_from_area(2.0));
    }

    #[test]
    fn test_rank_is_stable() {
        let order = rank_by_density(&[1.0, 3.0, 2.0, 3.0, 0.5]);
        assert_eq!(order, vec![1, 3, 2, 0, 4]);
        assert!(rank_by_density(&[]).is_empty());
    }

    #[test]
    fn test_count_within_matches_brute_force() {
        let points: Vec<[f64; 2]> = (0..60)
            .map(|i| {
                let t = i as f64;
                [(t * 7.3) % 40.0, (t * 3.1 + 5.0) % 40.0]
            })
            .collect();
        let radius = 6.5;
        let counts = count_within(40.0, &points, radius).unwrap();
        for (i, p) in points.iter().enumerate() {
            let expected = points
                .iter()
                .enumerate()
                .filter(|&(j, q)| {
                    let (dx, dy) = (q[0] - p[0], q[1] - p[1]);
                    j != i && dx * dx + dy * dy < radius * radius
                })
                .count();
            assert_eq!(counts[i], expected, "point {}", i);
        }
    }

    #[test]
    fn test_count_within_rejects_bad_radius() {
        assert_eq!(
            count_within(10.0, &[[1.0, 1.0]], 0.0),
            Err(DiagramError::InvalidSearchRadius(0.0))
        );
        assert!(count_within(10.0, &[[11.0, 1.0]], 1.0).is_err());
    }
}
