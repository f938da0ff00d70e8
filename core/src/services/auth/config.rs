//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether new accounts may self-register
    pub allow_registration: bool,
    /// Minimum password length accepted at registration
    pub min_password_length: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            min_password_length: 8,
        }
    }
}
