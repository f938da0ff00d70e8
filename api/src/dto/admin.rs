use serde::{Deserialize, Serialize};
use sg_core::domain::entities::access::{AccessProfile, RoleBrief};
use sg_core::domain::entities::risk::UnlockLogFilter;
use sg_core::services::UnlockRequest;
use sg_core::Role;
use sg_shared::{PageRequest, RiskConfig};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RiskConfigRequest {
    #[validate(range(min = 1))]
    pub phone_fail_threshold: i64,
    #[validate(range(min = 1))]
    pub ip_fail_threshold: i64,
    #[validate(range(min = 1))]
    pub ip_phone_threshold: i64,
    #[validate(range(min = 1, max = 31536000))]
    pub lock_seconds: i64,
}

impl From<RiskConfigRequest> for RiskConfig {
    fn from(request: RiskConfigRequest) -> Self {
        RiskConfig {
            phone_fail_threshold: request.phone_fail_threshold,
            ip_fail_threshold: request.ip_fail_threshold,
            ip_phone_threshold: request.ip_phone_threshold,
            lock_seconds: request.lock_seconds,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnlockRequestDto {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<UnlockRequestDto> for UnlockRequest {
    fn from(dto: UnlockRequestDto) -> Self {
        UnlockRequest {
            phone: dto.phone,
            ip: dto.ip,
            reason: dto.reason,
        }
    }
}

/// `?page=&page_size=` on the log listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::from_query(query.page, query.page_size)
    }
}

/// Query string of GET /admin/auth/unlock-logs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnlockLogQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub operator_user_id: Option<String>,
}

impl UnlockLogQuery {
    pub fn into_parts(self) -> (UnlockLogFilter, PageRequest) {
        let filter = UnlockLogFilter {
            phone: self.phone,
            ip: self.ip,
            operator_user_id: self.operator_user_id,
        };
        (filter, PageRequest::from_query(self.page, self.page_size))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessProfileResponse {
    pub user_id: String,
    pub role: Role,
    pub roles: Vec<RoleBrief>,
    pub permission_codes: Vec<String>,
}

impl AccessProfileResponse {
    pub fn new(role: Role, profile: AccessProfile) -> Self {
        Self {
            user_id: profile.user_id,
            role,
            roles: profile.roles,
            permission_codes: profile.permission_codes,
        }
    }
}
