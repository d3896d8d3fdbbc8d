pub mod auth;
pub mod detect;
pub mod health;
pub mod stats;
pub mod vehicle;
