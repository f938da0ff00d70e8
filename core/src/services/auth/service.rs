//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use sg_shared::mask_phone_number;
use tracing::{debug, info, warn};

use crate::domain::entities::audit::{reasons, AuditAction};
use crate::domain::entities::risk::LockStatus;
use crate::domain::entities::token::RefreshTokenRecord;
use crate::domain::entities::user::{Role, User};
use crate::domain::value_objects::{AuthResponse, RequestContext};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{
    AuditSink, LoginFailureRepository, RefreshTokenRepository, RiskConfigRepository,
    UserRepository,
};
use crate::services::audit::AuditService;
use crate::services::password::PasswordVerifier;
use crate::services::risk::{FailureOutcome, LoginRiskGuard, RiskCache, RiskConfigLoader};
use crate::services::token::{hash_token, TokenIssuer};

use super::config::AuthServiceConfig;

/// Authentication service for the session lifecycle
///
/// Generic over every store so tests can run against in-memory mocks.
pub struct AuthService<U, T, F, C, R, A>
where
    U: UserRepository,
    T: RefreshTokenRepository,
    F: LoginFailureRepository,
    C: RiskCache,
    R: RiskConfigRepository,
    A: AuditSink + 'static,
{
    /// User directory
    user_repository: Arc<U>,
    /// Durable refresh token store
    token_repository: Arc<T>,
    /// JWT signing
    token_issuer: Arc<TokenIssuer>,
    password_verifier: PasswordVerifier,
    risk_guard: Arc<LoginRiskGuard<F, C>>,
    risk_config: Arc<RiskConfigLoader<R>>,
    /// Optional audit service for the login log
    audit_service: Option<Arc<AuditService<A>>>,
    config: AuthServiceConfig,
}

impl<U, T, F, C, R, A> AuthService<U, T, F, C, R, A>
where
    U: UserRepository,
    T: RefreshTokenRepository,
    F: LoginFailureRepository,
    C: RiskCache,
    R: RiskConfigRepository,
    A: AuditSink + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        token_issuer: Arc<TokenIssuer>,
        password_verifier: PasswordVerifier,
        risk_guard: Arc<LoginRiskGuard<F, C>>,
        risk_config: Arc<RiskConfigLoader<R>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            token_issuer,
            password_verifier,
            risk_guard,
            risk_config,
            audit_service: None,
            config,
        }
    }

    /// Attach an audit service
    pub fn with_audit(mut self, audit_service: Arc<AuditService<A>>) -> Self {
        self.audit_service = Some(audit_service);
        self
    }

    /// Authenticate with phone and password
    ///
    /// Order matters: the lock check runs before the user lookup and the
    /// password check, so a locked caller learns nothing about the account.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - A fresh token pair
    /// * `Err(RateLimited)` - An active lock, or the failure just recorded produced one
    /// * `Err(InvalidCredentials)` - Unknown phone or wrong password
    /// * `Err(UserStatusInvalid)` - The account is not active
    /// * `Err(ValidationErr)` - `expire_seconds` exceeds the longest allowed lifetime
    pub async fn login(
        &self,
        phone: &str,
        password: &str,
        expire_seconds: Option<i64>,
        ctx: &RequestContext,
    ) -> DomainResult<AuthResponse> {
        let phone = phone.trim();
        require("phone", phone)?;
        require("password", password)?;
        let ttl = self.token_issuer.config().access_ttl(expire_seconds)?;

        let risk = self.risk_config.load().await?;

        if let Some(lock) = self.risk_guard.check_locked(&ctx.ip, phone, &risk).await? {
            self.audit_failure(AuditAction::Login, "", phone, lock.lock_type.as_str(), ctx)
                .await;
            return Err(rate_limited(lock));
        }

        let user = match self.user_repository.find_by_phone(phone).await? {
            Some(user) => user,
            None => {
                if let Err(e) = self.password_verifier.verify_dummy(password).await {
                    warn!(error = %e, "Dummy password verification failed");
                }
                let outcome = self.risk_guard.record_failure(&ctx.ip, phone, &risk).await?;
                self.audit_failure(AuditAction::Login, "", phone, reasons::USER_NOT_FOUND, ctx)
                    .await;
                return Err(reject(outcome, AuthError::InvalidCredentials));
            }
        };

        if !user.is_active() {
            let outcome = self.risk_guard.record_failure(&ctx.ip, phone, &risk).await?;
            self.audit_failure(AuditAction::Login, &user.id, phone, reasons::STATUS_NOT_ACTIVE, ctx)
                .await;
            return Err(reject(outcome, AuthError::UserStatusInvalid));
        }

        let check = self
            .password_verifier
            .verify(password, &user.password_hash)
            .await?;
        if !check.matched {
            let outcome = self.risk_guard.record_failure(&ctx.ip, phone, &risk).await?;
            self.audit_failure(
                AuditAction::Login,
                &user.id,
                phone,
                outcome.bad_password_reason(),
                ctx,
            )
            .await;
            return Err(reject(outcome, AuthError::InvalidCredentials));
        }

        if check.needs_upgrade() {
            self.upgrade_legacy_hash(&user, password).await;
        }

        let response = self.issue_pair(&user.id, ttl).await?;

        if let Err(e) = self.risk_guard.clear(&ctx.ip, phone).await {
            warn!(phone = %mask_phone_number(phone), error = %e, "Failed to clear login failures");
        }

        info!(user_id = %user.id, phone = %mask_phone_number(phone), ip = %ctx.ip, "Login succeeded");
        self.audit_success(AuditAction::Login, &user.id, phone, ctx).await;
        Ok(response)
    }

    /// Create an account and sign it in
    pub async fn register(
        &self,
        phone: &str,
        password: &str,
        email: Option<String>,
        ctx: &RequestContext,
    ) -> DomainResult<AuthResponse> {
        let phone = phone.trim();
        require("phone", phone)?;
        if !self.config.allow_registration {
            return Err(AuthError::InsufficientPermissions.into());
        }
        if password.chars().count() < self.config.min_password_length {
            return Err(ValidationError::InvalidFormat {
                field: "password".to_string(),
                reason: format!("must be at least {} characters", self.config.min_password_length),
            }
            .into());
        }

        if self.user_repository.phone_exists(phone).await? {
            self.audit_failure(AuditAction::Register, "", phone, "phone_exists", ctx)
                .await;
            return Err(AuthError::PhoneAlreadyExists.into());
        }

        let password_hash = self.password_verifier.hash(password).await?;
        let user = User::new(phone, email, password_hash);
        self.user_repository.create(&user).await?;

        let ttl = self.token_issuer.config().access_ttl_seconds;
        let response = self.issue_pair(&user.id, ttl).await?;

        info!(user_id = %user.id, phone = %mask_phone_number(phone), "User registered");
        self.audit_success(AuditAction::Register, &user.id, phone, ctx).await;
        Ok(response)
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The presented token is rotated atomically: of any number of
    /// concurrent calls with the same token exactly one succeeds.
    pub async fn refresh(&self, refresh_token: &str, ctx: &RequestContext) -> DomainResult<AuthResponse> {
        let refresh_token = refresh_token.trim();
        require("refresh_token", refresh_token)?;

        let result = self.rotate(refresh_token).await;
        match &result {
            Ok(response) => {
                debug!(user_id = %response.user_id, "Refresh token rotated");
                self.audit_success(AuditAction::Refresh, &response.user_id, "", ctx)
                    .await;
            }
            Err(e) if e.is_invalid_token() => {
                self.audit_failure(AuditAction::Refresh, "", "", "invalid_token", ctx)
                    .await;
            }
            Err(_) => {}
        }
        result
    }

    async fn rotate(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        let claims = self.token_issuer.verify_refresh_token(refresh_token)?;
        let now = Utc::now();

        let current = self
            .token_repository
            .find_active(&hash_token(refresh_token), now)
            .await?
            .filter(|record| record.user_id == claims.uid)
            .ok_or(TokenError::InvalidToken)?;

        let role = Role::for_user_id(&current.user_id);
        let config = self.token_issuer.config();
        let access_token =
            self.token_issuer
                .issue_access_token(&current.user_id, role.as_str(), config.access_ttl_seconds)?;
        let issued = self.token_issuer.issue_refresh_token(
            &current.user_id,
            role.as_str(),
            config.refresh_ttl_seconds,
        )?;

        let successor = RefreshTokenRecord::new(&current.user_id, issued.token_hash, issued.expires_at);
        self.token_repository
            .rotate(&current.id, &successor, now)
            .await?;

        Ok(AuthResponse::new(
            access_token,
            issued.token,
            config.access_ttl_seconds,
            current.user_id,
            role,
        ))
    }

    /// Revoke one refresh token
    ///
    /// Idempotent: unknown, already revoked or malformed tokens succeed
    /// without touching the store.
    pub async fn logout(&self, refresh_token: &str, ctx: &RequestContext) -> DomainResult<()> {
        let refresh_token = refresh_token.trim();
        require("refresh_token", refresh_token)?;

        let now = Utc::now();
        let record = self
            .token_repository
            .find_active(&hash_token(refresh_token), now)
            .await?;

        let user_id = match record {
            Some(record) => {
                self.token_repository.revoke(&record.id, now).await?;
                record.user_id
            }
            None => String::new(),
        };

        self.audit_success(AuditAction::Logout, &user_id, "", ctx).await;
        Ok(())
    }

    /// Revoke every active refresh token of a user
    pub async fn logout_all(&self, user_id: &str, ctx: &RequestContext) -> DomainResult<u64> {
        require("user_id", user_id)?;

        let revoked = self.token_repository.revoke_all(user_id, Utc::now()).await?;
        info!(user_id = user_id, revoked, "All sessions revoked");
        self.audit_success(AuditAction::LogoutAll, user_id, "", ctx).await;
        Ok(revoked)
    }

    async fn issue_pair(&self, user_id: &str, access_ttl: i64) -> DomainResult<AuthResponse> {
        let role = Role::for_user_id(user_id);
        let config = self.token_issuer.config();

        let access_token = self
            .token_issuer
            .issue_access_token(user_id, role.as_str(), access_ttl)?;
        let issued = self
            .token_issuer
            .issue_refresh_token(user_id, role.as_str(), config.refresh_ttl_seconds)?;

        let record = RefreshTokenRecord::new(user_id, issued.token_hash, issued.expires_at);
        self.token_repository.create(&record).await?;

        Ok(AuthResponse::new(access_token, issued.token, access_ttl, user_id, role))
    }

    /// Rewrite a matched legacy hash as bcrypt. Failures are logged only.
    async fn upgrade_legacy_hash(&self, user: &User, password: &str) {
        let upgraded = match self.password_verifier.hash(password).await {
            Ok(hash) => hash,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Failed to hash password for upgrade");
                return;
            }
        };
        match self
            .user_repository
            .update_password_hash(&user.id, &upgraded, Utc::now())
            .await
        {
            Ok(()) => info!(user_id = %user.id, "Legacy password hash upgraded"),
            Err(e) => warn!(user_id = %user.id, error = %e, "Failed to persist upgraded password hash"),
        }
    }

    async fn audit_success(&self, action: AuditAction, user_id: &str, phone: &str, ctx: &RequestContext) {
        if let Some(audit) = &self.audit_service {
            audit.success(action, user_id, phone, ctx).await;
        }
    }

    async fn audit_failure(
        &self,
        action: AuditAction,
        user_id: &str,
        phone: &str,
        reason: &str,
        ctx: &RequestContext,
    ) {
        if let Some(audit) = &self.audit_service {
            audit.failure(action, user_id, phone, reason, ctx).await;
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn rate_limited(lock: LockStatus) -> DomainError {
    DomainError::RateLimited {
        lock_type: lock.lock_type,
        locked_until: lock.locked_until,
    }
}

/// A failure that just produced a lock is reported as the lock
fn reject(outcome: FailureOutcome, err: AuthError) -> DomainError {
    match outcome.lock() {
        Some(lock) => rate_limited(lock),
        None => err.into(),
    }
}
