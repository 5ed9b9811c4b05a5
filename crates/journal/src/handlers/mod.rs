pub mod api;
pub mod entries;
pub mod error;
pub mod events;
pub mod health;
pub mod login;
pub mod pages;
pub mod preferences;

pub use error::AppError;
