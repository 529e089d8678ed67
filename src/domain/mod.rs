// Domain layer: site resources and the admin client ports.

pub mod model;
pub mod ports;
