use actix_web::{web, HttpResponse};

use crate::dto::UnlockRequestDto;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::{AppState, Stores};

/// Handler for POST /admin/auth/unlock
///
/// Clears the phone lock, the IP lock and counters, or both. At least one of
/// `phone` and `ip` is required. Answers with the unlock log entry.
pub async fn unlock<S: Stores>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    request: web::Json<UnlockRequestDto>,
) -> HttpResponse {
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(error);
    }

    match state
        .bounded(state.admin_service.unlock(&auth.user_id, request.into_inner().into()))
        .await
    {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(error) => handle_domain_error(error),
    }
}
