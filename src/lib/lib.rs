pub mod adapters;
pub mod controllers;
pub mod core;
#[cfg(feature = "storage")]
pub mod storage;
pub mod transport;


pub use crate::core::*;
