//! Administrative risk operations: runtime thresholds, manual unlock and
//! the caller's access profile.

mod service;


pub use service::{RiskAdminService, UnlockRequest};
