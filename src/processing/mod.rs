pub mod image_processing;
pub mod response_processing;

pub use self::image_processing::*;
pub use self::response_processing::*;
