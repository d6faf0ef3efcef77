// Domain layer: candidate models and ports (interfaces).

pub mod model;
pub mod ports;
