mod cache;
mod controller;
mod date;
mod event;
mod grid_service;
mod loader;
mod repository;
mod source;

pub mod deep_link;
pub mod detail;

pub use cache::*;
pub use controller::*;
pub use date::{now_millis, parse_date, resolve, today};
pub use event::*;
pub use grid_service::*;
pub use loader::*;
pub use repository::*;
pub use source::*;
