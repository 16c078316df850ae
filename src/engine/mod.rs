pub mod error;
pub mod geofence;
pub mod schedule;
