// Domain layer: table/grid models and the ports the core writes through.

pub mod model;
pub mod ports;
