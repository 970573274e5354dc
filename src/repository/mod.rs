//! Long-lived observables for session and user state.

mod session;
mod user;

pub use session::SessionRepository;
pub use user::{UserRepository, UserSource};
