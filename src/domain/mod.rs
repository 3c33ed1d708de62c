// Domain layer: models and ports. Concrete HTTP/file implementations live in `adapters`.

pub mod model;
pub mod ports;
