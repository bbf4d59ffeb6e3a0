pub mod error;
pub mod model;
pub mod role;
pub mod task;
