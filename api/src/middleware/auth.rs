//! JWT authentication middleware for protected endpoints.
//!
//! Extracts the bearer token from the Authorization header, verifies it as an
//! ACCESS token with the shared [`TokenIssuer`] and injects an [`AuthContext`]
//! into the request. Refresh tokens are rejected here.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sg_core::domain::entities::token::Claims;
use sg_core::errors::{AuthError, DomainError, TokenError};
use sg_core::services::TokenIssuer;
use sg_core::Role;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use crate::handlers::handle_domain_error;

/// Authenticated caller injected into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub role: Role,
    /// JWT ID of the presented access token
    pub jti: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        let role = if claims.role.eq_ignore_ascii_case(Role::Admin.as_str()) {
            Role::Admin
        } else {
            Role::User
        };
        Self {
            user_id: claims.uid,
            role,
            jti: claims.jti,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 403 unless the caller holds the ADMIN role
    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions.into())
        }
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    issuer: Arc<TokenIssuer>,
}

impl JwtAuth {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            issuer: Arc::clone(&self.issuer),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let issuer = Arc::clone(&self.issuer);

        Box::pin(async move {
            let verified = extract_bearer_token(&req)
                .ok_or(DomainError::Token(TokenError::InvalidToken))
                .and_then(|token| issuer.verify_access_token(&token));

            match verified {
                Ok(claims) => {
                    req.extensions_mut().insert(AuthContext::from_claims(claims));
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(error) => {
                    tracing::debug!(path = req.path(), "Rejected unauthenticated request");
                    let response = handle_domain_error(error);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                let response = handle_domain_error(TokenError::InvalidToken.into());
                actix_web::error::InternalError::from_response("authentication required", response).into()
            });

        ready(result)
    }
}
