//! Persistence module
//!
//! Handles:
//! - The JSON record format (`facade`)
//! - Loading, saving, importing and exporting session files (`storage`)

pub mod facade;
mod storage;

pub use facade::Facade;
pub use storage::*;
