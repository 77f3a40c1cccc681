pub mod handlers;
pub mod session;
pub mod state;

pub use session::{SessionGate, StaticSession};
pub use state::AppState;
