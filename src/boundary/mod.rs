pub mod model;
pub mod service;

pub use model::BoundaryFeature;
pub use model::BoundarySet;
