use actix_web::HttpResponse;

use crate::dto::MeResponse;
use crate::middleware::AuthContext;

/// Handler for GET /auth/me
///
/// Requires `Authorization: Bearer {access_token}`. Echoes the identity in
/// the token without touching any store.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user_id: auth.user_id,
        role: auth.role.as_str().to_string(),
    })
}
