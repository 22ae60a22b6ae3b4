use vorodensity::{AREA_OFFSET, DensityStrategy, DiagramError, count_within, rank_by_density};

#[test]
fn test_voronoi_density_is_inverse_area() {
    let points = [[20.0, 50.0], [80.0, 50.0]];
    let densities = DensityStrategy::Voronoi.estimate(100.0, &points).unwrap();
    let expected = 1.0 / (5000.0 + AREA_OFFSET);
    for d in densities {
        assert!((d - expected).abs() < 1e-12, "density {}", d);
    }
}

#[test]
fn test_clustered_sites_rank_first() {
    // Three sites packed together in the middle of a ring of eight.
    let points = [
        [50.0, 50.0],
        [52.3, 50.4],
        [49.6, 52.1],
        [11.0, 9.0],
        [49.0, 12.0],
        [91.0, 8.0],
        [8.0, 48.0],
        [92.0, 53.0],
        [12.0, 91.0],
        [51.0, 88.0],
        [89.0, 92.0],
    ];
    for strategy in [
        DensityStrategy::Voronoi,
        DensityStrategy::DistanceCount { search_radius: 5.0 },
    ] {
        let densities = strategy.estimate(100.0, &points).unwrap();
        let ranking = rank_by_density(&densities);
        let mut top: Vec<usize> = ranking[..3].to_vec();
        top.sort_unstable();
        assert_eq!(top, vec![0, 1, 2], "{:?} ranked {:?}", strategy, ranking);
    }
}

#[test]
fn test_distance_count_values() {
    let points = [[10.0, 10.0], [11.0, 10.0], [10.0, 11.0], [80.0, 80.0]];
    let counts = DensityStrategy::DistanceCount { search_radius: 5.0 }
        .estimate(100.0, &points)
        .unwrap();
    assert_eq!(counts, vec![2.0, 2.0, 2.0, 0.0]);
    // Coincident points are fine for counting.
    assert_eq!(count_within(10.0, &[[1.0, 1.0], [1.0, 1.0]], 0.5).unwrap(), vec![1, 1]);
}

#[test]
fn test_default_strategy_is_voronoi() {
    assert_eq!(DensityStrategy::default(), DensityStrategy::Voronoi);
}

#[test]
fn test_strategy_errors() {
    let strategy = DensityStrategy::DistanceCount { search_radius: -1.0 };
    assert_eq!(
        strategy.estimate(10.0, &[[1.0, 1.0]]),
        Err(DiagramError::InvalidSearchRadius(-1.0))
    );
    assert!(DensityStrategy::Voronoi.estimate(10.0, &[[1.0, 1.0], [1.0, 1.0]]).is_err());
}
