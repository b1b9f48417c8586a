use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::warn;

use service::auth::domain::{AddressInput, Claims, LoginInput, SignupInput};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{verify_token, AuthConfig, AuthService};
use service::newsletter::Mailer;
use service::storage::MediaStorage;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub storage: Arc<MediaStorage>,
    pub media: configs::MediaConfig,
    pub mailer: Option<Arc<Mailer>>,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(repo, AuthConfig { jwt_secret: self.auth.jwt_secret.clone(), ..AuthConfig::default() })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupBody {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressInput>,
}

fn auth_cookie(token: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new("auth_token", token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[utoipa::path(post, path = "/users/login", tag = "users", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Authenticated"), (status = 400, description = "Bad Request"), (status = 404, description = "Wrong email or password")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::BadRequest("Missing email or password".into()));
    };

    let session = state
        .auth_service()
        .login(LoginInput { email, password })
        .await
        .map_err(|e| match e {
            // the login form only reports one thing for both cases
            AuthError::NotFound | AuthError::Unauthorized => {
                ApiError::NotFound("Email or password wrong".into())
            }
            other => ApiError::from(other),
        })?;

    let jar = jar.add(auth_cookie(&session.token));
    Ok((jar, Json(serde_json::json!({ "message": "Authentication successful", "token": session.token }))))
}

#[utoipa::path(post, path = "/users/signup", tag = "users", request_body = crate::openapi::SignupRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 409, description = "Email already registered")))]
pub async fn signup(
    State(state): State<ServerState>,
    Json(body): Json<SignupBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(first_name), Some(last_name), Some(email), Some(password), Some(phone), Some(address)) =
        (body.first_name, body.last_name, body.email, body.password, body.phone, body.address)
    else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };

    state
        .auth_service()
        .signup(SignupInput { first_name, last_name, email, password, phone, address })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "User and address created successfully" })),
    ))
}

#[utoipa::path(post, path = "/admin/login", tag = "admin", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Authenticated"), (status = 401, description = "Invalid email or password")))]
pub async fn admin_login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::BadRequest("Missing email or password".into()));
    };

    let session = state
        .auth_service()
        .admin_login(LoginInput { email, password })
        .await
        .map_err(|e| match e {
            AuthError::Unauthorized => ApiError::Unauthorized("Invalid email or password".into()),
            other => ApiError::from(other),
        })?;

    let jar = jar.add(auth_cookie(&session.token));
    Ok((jar, Json(serde_json::json!({ "message": "Admin authentication successful", "token": session.token }))))
}

/// Middleware guarding the API routes: requires `Authorization: Bearer`
/// (with an `auth_token` cookie fallback) and injects the verified claims
/// into request extensions. Missing credentials are 401, a bad or expired
/// token is 403.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();

    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let Some(rest) = h.strip_prefix("Bearer ") else {
                warn!(%path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::Unauthorized("Token missing".into()));
            };
            rest.to_string()
        } else {
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                if let Some(rest) = part.trim().strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }
            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    warn!(%path, "missing Authorization header and auth_token cookie");
                    return Err(ApiError::Unauthorized("Authorization header missing".into()));
                }
            }
        }
    };

    match verify_token(&token, &state.auth.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(%path, error = %e, "token validation failed");
            Err(ApiError::Forbidden("Invalid or expired token".into()))
        }
    }
}

/// Route-level guard for admin-only endpoints, applied after
/// [`require_bearer_token`] has injected the claims.
pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if claims.admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Access denied. Admin privileges required.".into()))
    }
}
