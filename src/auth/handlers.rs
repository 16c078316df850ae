use crate::{
    auth::{
        jwt::{self, generate_access_token, generate_refresh_token, verify_token},
        password::verify_password,
    },
    config::Config,
    model::user::User,
    models::{LoginReqDto, TokenType},
    store::{RefreshTokenStore, UserStore},
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

#[derive(Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub job_title: String,
    pub department: String,
    pub role_id: u8,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            job_title: user.job_title.clone(),
            department: user.department.clone(),
            role_id: user.role_id,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionUser,
}

#[instrument(
    name = "auth_login",
    skip(users, tokens, config, req),
    fields(username = %req.username)
)]
pub async fn login(
    req: web::Json<LoginReqDto>,
    users: web::Data<UserStore>,
    tokens: web::Data<RefreshTokenStore>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if req.username.trim().is_empty() || req.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    let user = match users.find_by_username(req.username.trim()) {
        Some(user) => {
            debug!(user_id = %user.id, "User found");
            user
        }
        None => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
    };

    if let Err(e) = verify_password(&req.password, &user.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Password verified, issuing tokens");

    let access_token = generate_access_token(
        &user.id,
        user.username.clone(),
        user.role_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        &user.id,
        user.username.clone(),
        user.role_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    tokens.insert(&refresh_claims.jti, &user.id, refresh_claims.exp);

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        user: SessionUser::from(&user),
    })
}

pub async fn refresh_token(
    req: HttpRequest,
    tokens: web::Data<RefreshTokenStore>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    if !tokens.is_active(&claims.jti, jwt::now()) {
        return HttpResponse::Unauthorized().finish();
    }

    // rotate: revoke the old jti, issue a fresh pair
    tokens.revoke(&claims.jti);

    let (new_refresh_token, new_claims) = generate_refresh_token(
        &claims.user_id,
        claims.sub.clone(),
        claims.role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );
    tokens.insert(&new_claims.jti, &claims.user_id, new_claims.exp);

    let access_token = generate_access_token(
        &claims.user_id,
        claims.sub.clone(),
        claims.role,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    }))
}

/// Revokes the presented refresh token. Succeeds even when the token is
/// unknown or already revoked.
pub async fn logout(
    req: HttpRequest,
    tokens: web::Data<RefreshTokenStore>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    tokens.revoke(&claims.jti);

    HttpResponse::NoContent().finish()
}
