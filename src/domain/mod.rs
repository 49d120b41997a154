pub mod handles;
pub mod intent;
pub mod ports;
pub mod routes;
