pub mod bus;
pub mod command;
pub mod controller;
pub mod ipc;
