/// Admin authentication and authorization
///
/// - Argon2 password hashes for admin_users rows
/// - In-memory sessions and one-hour reset tokens
/// - Hot-reloadable allow-list and the per-request `AdminSession` extractor

pub mod access;
pub mod extract;
pub mod password;
pub mod service;
pub mod session;

pub use access::{authorize, AccessList, AccessRegistry, Authorization};
pub use extract::AdminSession;
pub use service::AuthService;
pub use session::{Session, SessionStore};
