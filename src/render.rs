pub mod compositor;
pub mod frame;
