pub mod admin;
pub mod auth;

pub use admin::{
    AccessProfileResponse, PageQuery, RiskConfigRequest, UnlockLogQuery, UnlockRequestDto,
};
pub use auth::{
    LoginRequest, LogoutAllResponse, LogoutRequest, LogoutResponse, MeResponse,
    RefreshTokenRequest, RegisterRequest,
};
