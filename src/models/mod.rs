pub mod n8n;
pub mod render_product;
pub mod session;
pub mod wizard;

pub use self::n8n::*;
pub use self::render_product::*;
pub use self::session::*;
pub use self::wizard::*;
