pub mod envelope;
pub mod state;

pub use envelope::ApiResponse;
pub use state::AppState;
