pub mod prelude;

pub mod shifts;
pub mod transactions;
pub mod users;
