pub mod csv_log;
pub mod error;
pub mod queue;
pub mod server;
pub mod state;
pub mod stats;
pub mod telemetry;
pub mod window;

pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;
pub use telemetry::SensorSample;
