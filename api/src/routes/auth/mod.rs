//! Authentication route handlers
//!
//! - Password login and registration
//! - Refresh token rotation
//! - Logout of one session or of every session
//! - Identity of the presented access token

pub mod login;
pub mod logout;
pub mod logout_all;
pub mod me;
pub mod refresh;
pub mod register;

pub use login::login;
pub use logout::logout;
pub use logout_all::logout_all;
pub use me::me;
pub use refresh::refresh_token;
pub use register::register;
