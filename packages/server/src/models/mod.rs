pub mod auth;
pub mod detect;
pub mod stats;
pub mod vehicle;
