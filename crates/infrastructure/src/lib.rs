pub mod bus;
pub mod database;
pub mod dns;
pub mod repositories;
