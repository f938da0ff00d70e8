//! Caller network context threaded from the HTTP layer into services.

/// Client address and user agent of the current request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Resolved client IP; empty when it could not be determined
    pub ip: String,
    pub user_agent: String,
}

impl RequestContext {
    pub fn new(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: ip.into().trim().to_string(),
            user_agent: user_agent.into(),
        }
    }

    /// IP-scoped risk checks only apply when an IP is known
    pub fn has_ip(&self) -> bool {
        !self.ip.is_empty()
    }
}
