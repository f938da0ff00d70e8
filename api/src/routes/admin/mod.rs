//! Login-risk administration, ADMIN role only

pub mod access_profile;
pub mod logs;
pub mod risk_config;
pub mod unlock;

pub use access_profile::access_profile;
pub use logs::{risk_config_logs, unlock_logs};
pub use risk_config::{get_risk_config, update_risk_config};
pub use unlock::unlock;
