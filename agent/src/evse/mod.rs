pub mod charge_limit;
pub mod client;
pub mod overrides;
pub mod transport;
