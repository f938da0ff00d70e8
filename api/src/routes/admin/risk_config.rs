use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::RiskConfigRequest;
use crate::handlers::{handle_domain_error, validation_error_response};
use crate::middleware::AuthContext;
use crate::state::{AppState, Stores};

/// Handler for GET /admin/auth/risk-config
///
/// The thresholds in force: the stored row merged over the defaults.
pub async fn get_risk_config<S: Stores>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
) -> HttpResponse {
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(error);
    }

    match state.bounded(state.admin_service.get_config()).await {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for PUT /admin/auth/risk-config
///
/// # Request Body
///
/// ```json
/// {
///     "phone_fail_threshold": 5,
///     "ip_fail_threshold": 20,
///     "ip_phone_threshold": 5,
///     "lock_seconds": 900
/// }
/// ```
///
/// Every value must be greater than zero. The change applies to the next
/// login and is written to the config change log.
pub async fn update_risk_config<S: Stores>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    request: web::Json<RiskConfigRequest>,
) -> HttpResponse {
    if let Err(error) = auth.require_admin() {
        return handle_domain_error(error);
    }
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let next = request.into_inner().into();
    match state
        .bounded(state.admin_service.update_config(&auth.user_id, next))
        .await
    {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(error) => handle_domain_error(error),
    }
}
