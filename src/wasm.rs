use crate::bounds::Domain;
use crate::cell::VoronoiCell;
use crate::density::{DensityStrategy, density_from_area};
use crate::diagram::Diagram;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_SIDES: &'static str = r#"
export const SIDE_ID_LEFT = -1;
export const SIDE_ID_RIGHT = -2;
export const SIDE_ID_BOTTOM = -3;
export const SIDE_ID_TOP = -4;
"#;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// --- Cell Wrapper ---

#[wasm_bindgen(js_name = Cell2D)]
pub struct Cell2DWASM {
    inner: VoronoiCell,
}

#[wasm_bindgen(js_class = Cell2D)]
impl Cell2DWASM {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> usize { self.inner.id() }
    #[wasm_bindgen(getter)]
    pub fn site(&self) -> Vec<f64> { self.inner.site().to_vec() }
    #[wasm_bindgen(getter)]
    pub fn vertices(&self) -> Vec<f64> { self.inner.vertices().to_vec() }
    #[wasm_bindgen(getter)]
    pub fn edge_neighbors(&self) -> Vec<i32> { self.inner.edge_neighbors().to_vec() }
    pub fn area(&self) -> f64 { self.inner.area() }
    pub fn centroid(&self) -> Vec<f64> { self.inner.centroid().to_vec() }
}

// --- Diagram ---

#[wasm_bindgen(js_name = Diagram2D)]
pub struct Diagram2D {
    inner: Diagram,
}

#[wasm_bindgen(js_class = Diagram2D)]
impl Diagram2D {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64) -> Result<Diagram2D, JsValue> {
        let domain = Domain::new(width).map_err(to_js)?;
        Ok(Diagram2D { inner: Diagram::new(domain) })
    }
    pub fn set_sites(&mut self, sites: &[f64]) -> Result<(), JsValue> { self.inner.set_sites(sites).map_err(to_js) }
    pub fn random_sites(&mut self, count: usize) { self.inner.random_sites(count, get_seed()); }
    pub fn calculate(&mut self) { self.inner.calculate(); }
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 { self.inner.domain().width() }
    #[wasm_bindgen(getter)]
    pub fn count_sites(&self) -> usize { self.inner.count_sites() }
    #[wasm_bindgen(getter)]
    pub fn count_cells(&self) -> usize { self.inner.count_cells() }
    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<f64> { self.inner.sites() }
    pub fn get_cell(&self, index: usize) -> Option<Cell2DWASM> { self.inner.get_cell(index).cloned().map(|inner| Cell2DWASM { inner }) }
    #[wasm_bindgen(getter)]
    pub fn cells(&self) -> Vec<Cell2DWASM> { self.inner.cells().iter().cloned().map(|inner| Cell2DWASM { inner }).collect() }
    pub fn areas(&self) -> Vec<f64> { self.inner.areas() }
    pub fn densities(&self) -> Vec<f64> { self.inner.areas().into_iter().map(density_from_area).collect() }

    /// Counts, for every site, the other sites closer than `search_radius`.
    pub fn count_densities(&self, search_radius: f64) -> Result<Vec<f64>, JsValue> {
        let points: Vec<[f64; 2]> = self.inner.sites().chunks_exact(2).map(|c| [c[0], c[1]]).collect();
        DensityStrategy::DistanceCount { search_radius }
            .estimate(self.inner.domain().width(), &points)
            .map_err(to_js)
    }

    /// Flat vertices of cell `index`, empty if there is no such cell.
    pub fn cell_vertices(&self, index: usize) -> Vec<f64> {
        self.inner.get_cell(index).map(|c| c.vertices().to_vec()).unwrap_or_default()
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}
