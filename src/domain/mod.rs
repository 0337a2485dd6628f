// Domain layer: menu model and ports (interfaces).

pub mod model;
pub mod ports;
