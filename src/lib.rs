//! Club Admin
//!
//! Client core for a football club's website backend: per-resource admin
//! managers (collection store, edit form, delete confirmation), the admin
//! session, dashboard counts and the public read pages.

pub mod attachment;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod manager;
pub mod models;
pub mod public;
pub mod resource;
pub mod transport;

pub use config::Config;
pub use errors::AppError;
pub use manager::ResourceManager;
pub use resource::{RecordId, Resource};
pub use transport::{HttpTransport, Transport};

#[cfg(test)]
mod testing;
