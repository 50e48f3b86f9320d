// Domain layer: core models and ports. No transport or runtime dependencies.

pub mod model;
pub mod ports;
