mod common;
mod detect;
mod store;
