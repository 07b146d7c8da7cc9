pub mod client_addr;
pub mod time;
