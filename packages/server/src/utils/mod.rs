pub mod cookies;
pub mod image;
pub mod jwt;
