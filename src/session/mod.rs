//! Session feature: the signed-in user, its durable copy and the context that
//! hands it to the rest of the application. The persisted record is the
//! backend's user profile; it holds no passwords or tokens.

pub mod client;
pub mod context;
pub mod state;
pub mod storage;
pub mod types;

pub use context::{provide_auth, try_use_auth, use_auth, Context};
pub use state::{SessionStore, SESSION_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::{AuthResponse, LoginRequest, RegisterRequest, User, UserId};
