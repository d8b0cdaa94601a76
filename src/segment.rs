pub mod builder;
pub mod slots;
