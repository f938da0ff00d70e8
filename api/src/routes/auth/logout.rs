use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{LogoutRequest, LogoutResponse};
use crate::handlers::{handle_domain_error, validation_error_response, ClientContext};
use crate::state::{AppState, Stores};

/// Handler for POST /auth/logout
///
/// Revokes the given refresh token. Answers 200 whether or not the token was
/// still active, so repeating the call is harmless.
pub async fn logout<S: Stores>(
    state: web::Data<AppState<S>>,
    client: ClientContext,
    request: web::Json<LogoutRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let result = state
        .bounded(state.auth_service.logout(request.refresh_token.trim(), &client.0))
        .await;

    match result {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
