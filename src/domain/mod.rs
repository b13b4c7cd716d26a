// Domain layer: indicator models and ports. No network or file access here.

pub mod model;
pub mod ports;
