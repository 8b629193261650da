// Domain layer: models and ports (interfaces). Nothing here touches the
// filesystem or spawns processes; adapters do.

pub mod model;
pub mod ports;
