//! # vorodensity
//!
//! `vorodensity` estimates how crowded each agent of a point population is by building the
//! Voronoi diagram of the agents with Fortune's sweep on a square domain `[0, w] x [0, w]` and
//! reading the area of every cell. It is designed to be used in Rust as well as compiled to
//! WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Fortune's sweep**: site and circle events drive an arena-backed beachline, with stale
//!   circle events detected at pop time.
//! - **Closed cells**: edges are clipped to the domain and the domain sides are split among the
//!   cells touching them, so every cell area is finite and the areas sum to `w²`.
//! - **Density strategies**: inverse Voronoi area, or a grid-accelerated neighbour count.
//! - **WASM-first**: the [`Diagram`] is exposed to JavaScript as `Diagram2D`.
//!
//! ## Example
//!
//! See the `demos/` directory for an SVG rendering of a diagram.
//!
//! ```
//! let areas = vorodensity::voronoi_areas(100.0, &[[20.0, 50.0], [80.0, 50.0]]).unwrap();
//! assert!((areas[0] - 5000.0).abs() < 1e-6);
//! ```

pub mod algorithm;
mod beachline;
mod bounds;
mod cell;
mod clip;
mod density;
mod diagram;
mod error;
mod events;
mod geometry;
pub mod wasm;

pub use bounds::Domain;
pub use bounds::EPSILON;
pub use bounds::SIDE_ID_BOTTOM;
pub use bounds::SIDE_ID_LEFT;
pub use bounds::SIDE_ID_RIGHT;
pub use bounds::SIDE_ID_TOP;
pub use bounds::Side;
pub use cell::VoronoiCell;
pub use density::AREA_OFFSET;
pub use density::DensityStrategy;
pub use density::count_within;
pub use density::density_from_area;
pub use density::rank_by_density;
pub use diagram::Diagram;
pub use diagram::SweepStats;
pub use diagram::voronoi_areas;
pub use diagram::voronoi_areas_by_key;
pub use error::DiagramError;
pub use geometry::Point;
pub use geometry::Segment;
