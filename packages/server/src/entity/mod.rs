pub mod plate_record;
pub mod user;
