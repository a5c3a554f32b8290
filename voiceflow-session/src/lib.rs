pub mod session;
pub mod traits;

pub use session::*;
pub use traits::*;
