pub mod jwt;
pub mod login;
pub mod session;

pub use session::SessionStore;
