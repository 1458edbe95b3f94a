pub mod client_identity;
pub mod metrics;

pub use metrics::*;
