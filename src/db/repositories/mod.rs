pub mod shift;
pub mod transaction;
pub mod user;
