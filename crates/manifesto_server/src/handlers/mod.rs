pub mod household_handlers;
pub mod snapshot_handlers;

pub use household_handlers::*;
pub use snapshot_handlers::*;
