use actix_web::{web, HttpResponse};

use crate::dto::LogoutAllResponse;
use crate::handlers::{handle_domain_error, ClientContext};
use crate::middleware::AuthContext;
use crate::state::{AppState, Stores};

/// Handler for POST /auth/logout-all
///
/// Requires `Authorization: Bearer {access_token}`. Revokes every active
/// refresh token of the caller. Access tokens already issued stay valid
/// until they expire.
pub async fn logout_all<S: Stores>(
    state: web::Data<AppState<S>>,
    client: ClientContext,
    auth: AuthContext,
) -> HttpResponse {
    let result = state
        .bounded(state.auth_service.logout_all(&auth.user_id, &client.0))
        .await;

    match result {
        Ok(revoked) => HttpResponse::Ok().json(LogoutAllResponse {
            message: "Logged out of all sessions".to_string(),
            revoked,
        }),
        Err(error) => handle_domain_error(error),
    }
}
