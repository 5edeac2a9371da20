pub mod credentials;
pub mod error;
pub mod logging;
pub mod models;
pub mod settings;
