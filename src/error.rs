use thiserror::Error;

/// Errors raised while validating the input of a diagram build.
///
/// The sweep itself never fails: every degenerate configuration it meets resolves to a
/// sentinel (a missing intersection, an unfinished edge). Only caller input is rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiagramError {
    #[error("domain width must be finite and positive, got {0}")]
    InvalidWidth(f64),
    #[error("site {index} has a non-finite coordinate")]
    NonFiniteSite { index: usize },
    #[error("site {index} at ({x}, {y}) lies outside the domain")]
    SiteOutOfBounds { index: usize, x: f64, y: f64 },
    #[error("sites {first} and {second} share the same position")]
    DuplicateSite { first: usize, second: usize },
    #[error("flat coordinate list has odd length {0}")]
    MalformedCoordinates(usize),
    #[error("search radius must be finite and positive, got {0}")]
    InvalidSearchRadius(f64),
}
