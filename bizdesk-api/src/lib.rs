pub mod config;
pub mod controller;
pub mod dashboard;
pub mod database;
pub mod entities;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod helpers;
pub mod session;
pub mod shell;

pub use controller::Controller;
pub use database::Database;
pub use gateway::{Gateway, RestGateway, SqliteGateway};
pub use session::SessionContext;
pub use shell::Shell;
