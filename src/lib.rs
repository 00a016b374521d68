// Module declarations for the library crate.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod io;
pub mod keycode;
pub mod logging;
pub mod manager;
pub mod mapping;
pub mod mapset;
pub mod stats;
pub mod syntax;
pub mod terminfo;
pub mod util;

pub use error::{Error, Result};
pub use keycode::KeyCode;
pub use mapping::Mapping;
pub use mapset::MappingSet;
