pub mod prelude;

pub mod matricules;
pub mod users;
