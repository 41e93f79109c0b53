pub mod n8n_client;
pub mod session_store;
pub mod wizard;

pub use self::session_store::*;
