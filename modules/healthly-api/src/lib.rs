pub mod auth;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod password;
pub mod routes;
pub mod state;
pub mod store;
pub mod traits;
pub mod uploads;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::{AppState, Upstreams};
