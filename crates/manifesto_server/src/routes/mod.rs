pub mod household;
pub mod snapshots;

pub use household::household_routes;
pub use snapshots::snapshot_routes;
