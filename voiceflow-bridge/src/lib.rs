pub mod bridge;
pub mod dispatcher;
pub mod router;
pub mod supervisor;
pub mod traits;
