pub mod env;

pub use env::GatewayConfig;
