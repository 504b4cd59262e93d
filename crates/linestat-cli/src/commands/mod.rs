pub mod classify;
pub mod estimate;
