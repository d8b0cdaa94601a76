pub mod scheduler;
pub mod wait;
