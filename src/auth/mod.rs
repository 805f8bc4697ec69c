pub mod middleware;
pub mod provider;
pub mod rate_limit;
pub mod session;

/// How the identity gate treats anonymous requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Every protected route requires a verified subject.
    Enforced,
    /// Local development only: anonymous requests reach the handlers, which
    /// answer reads with empty results and still reject writes.
    DevBypass,
}

impl AuthMode {
    pub fn is_bypass(&self) -> bool {
        matches!(self, AuthMode::DevBypass)
    }
}
