pub mod metric;
pub mod telemetry;
pub mod window;

pub use metric::*;
pub use telemetry::*;
pub use window::*;
