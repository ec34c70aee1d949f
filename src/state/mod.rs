pub mod lifecycle;
pub mod monitors;
pub mod placement;
pub mod registry;
pub mod scheduler;
