use actix_web::{web, HttpResponse};

use crate::dto::AccessProfileResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::{AppState, Stores};

/// Handler for GET /admin/auth/access-profile
///
/// Roles and permission codes of the calling administrator.
pub async fn access_profile<S: Stores>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
) -> HttpResponse {
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(error);
    }

    match state
        .bounded(state.admin_service.access_profile(&auth.user_id))
        .await
    {
        Ok(profile) => HttpResponse::Ok().json(AccessProfileResponse::new(auth.role, profile)),
        Err(error) => handle_domain_error(error),
    }
}
