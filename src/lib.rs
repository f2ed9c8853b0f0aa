#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod loader;
pub mod markup;
pub mod model;
pub mod normalize;
pub mod page;
pub mod parser;
pub mod render;
pub mod session;
pub mod topics;
pub mod window;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
pub use error::LoadError;
pub use model::{Post, PostCollection, RawRecord};
