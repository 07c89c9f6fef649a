//! Backend endpoint paths, relative to the configured API base URL.

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
}
