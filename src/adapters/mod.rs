// Adapters layer: transports over the core services.

pub mod http;
