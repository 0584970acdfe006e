// Path Planning algorithms module

pub mod dwa;

pub use dwa::*;
