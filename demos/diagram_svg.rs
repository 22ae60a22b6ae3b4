use plotters::prelude::*;
use rand::Rng;
use tracing_subscriber::EnvFilter;
use vorodensity::{Diagram, Domain, density_from_area, rank_by_density};

const WIDTH: f64 = 100.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = rand::thread_rng();

    // A dense cluster in one corner on top of a uniform background.
    let mut sites = Vec::with_capacity(600 * 2);
    for _ in 0..400 {
        sites.push(rng.gen_range(0.0..WIDTH));
        sites.push(rng.gen_range(0.0..WIDTH));
    }
    for _ in 0..200 {
        sites.push(rng.gen_range(0.0..WIDTH * 0.3));
        sites.push(rng.gen_range(0.0..WIDTH * 0.3));
    }

    let mut diagram = Diagram::new(Domain::new(WIDTH)?);
    diagram.set_sites(&sites)?;
    diagram.calculate();

    let densities: Vec<f64> = diagram.areas().into_iter().map(density_from_area).collect();
    let ranking = rank_by_density(&densities);
    let mut shade = vec![0.0; ranking.len()];
    for (rank, &i) in ranking.iter().enumerate() {
        shade[i] = 1.0 - rank as f64 / ranking.len() as f64;
    }

    let filename = "diagram_density.svg";
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(0.0..WIDTH, 0.0..WIDTH)?;

    // Draw domain
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (WIDTH, 0.0), (WIDTH, WIDTH), (0.0, WIDTH), (0.0, 0.0)],
        BLACK.stroke_width(2),
    )))?;

    // Draw cells, darker for denser
    for cell in diagram.cells() {
        let vertices = cell.vertices();
        if vertices.len() < 6 {
            continue;
        }
        let mut poly: Vec<(f64, f64)> = vertices.chunks(2).map(|c| (c[0], c[1])).collect();

        chart.draw_series(std::iter::once(Polygon::new(
            poly.clone(),
            BLUE.mix(0.05 + 0.6 * shade[cell.id()]).filled(),
        )))?;

        poly.push(poly[0]);
        chart.draw_series(std::iter::once(PathElement::new(poly, BLACK.mix(0.5))))?;
    }

    // Draw sites
    let points: Vec<(f64, f64)> = sites.chunks(2).map(|c| (c[0], c[1])).collect();
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 2, RED.filled())))?;

    root.present()?;

    let stats = diagram.stats();
    println!(
        "{} sites, {} circle events ({} stale), {} edges",
        diagram.count_sites(),
        stats.circle_events,
        stats.stale_events,
        stats.edges
    );
    println!("Output saved to {}", filename);
    Ok(())
}
