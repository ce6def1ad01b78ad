pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{create_router, with_middleware};
pub use state::AppState;
