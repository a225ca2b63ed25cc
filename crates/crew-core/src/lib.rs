#![deny(warnings)]
pub mod error;
pub mod game;
pub mod model;
pub mod tasks;

pub use error::{GameError, Result};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "crew"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
