use actix_web::{web, HttpResponse};

use crate::dto::{PageQuery, UnlockLogQuery};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::{AppState, Stores};

/// Handler for GET /admin/auth/risk-config-logs
///
/// Threshold change history, newest first. `page` defaults to 1 and
/// `page_size` to 20 (at most 200).
pub async fn risk_config_logs<S: Stores>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(error);
    }

    match state
        .bounded(state.admin_service.list_config_changes(query.into_inner().into()))
        .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /admin/auth/unlock-logs
///
/// Manual unlock history, newest first, optionally narrowed by `phone`,
/// `ip` and `operator_user_id`.
pub async fn unlock_logs<S: Stores>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    query: web::Query<UnlockLogQuery>,
) -> HttpResponse {
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(error);
    }

    let (filter, page) = query.into_inner().into_parts();
    match state
        .bounded(state.admin_service.list_unlocks(filter, page))
        .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => handle_domain_error(error),
    }
}
