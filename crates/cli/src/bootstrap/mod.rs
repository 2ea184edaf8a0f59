pub mod bus;
pub mod config;
pub mod database;
pub mod logging;
pub mod shutdown;

pub use bus::connect_bus;
pub use config::load_config;
pub use database::init_database;
pub use logging::init_logging;
pub use shutdown::shutdown_token;
