pub mod connection;
pub mod mongo;
pub mod store;
