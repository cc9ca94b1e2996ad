pub mod booking;
pub mod catalogue;
pub mod chat;
pub mod config;
pub mod providers;
pub mod sos;

mod context;

pub use context::AppContext;
