use crate::{
    models::{auth::TokenClaims, prelude::Users, users},
    routes::{ApiResponse, ErrorResponseBody, LoginResponseBody},
    utils::{build_err_resp, hash_pass},
    AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::sync::Arc;

const STATE_COOKIE: &str = "oauth_state";

#[derive(Debug, Deserialize)]
pub struct FacebookCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error_description: Option<String>,
}

/// Redirect to Facebook's login dialog.
#[utoipa::path(get, path = "/api/oauth/facebook", responses(
    (status = 303, description = "Redirect to the provider."),
    (status = 404, description = "Facebook login is not configured.", body = ErrorResponse),
))]
pub async fn get_facebook(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    let facebook = data.facebook.as_ref().ok_or_else(|| {
        build_err_resp(StatusCode::NOT_FOUND, "Facebook login is not configured.")
    })?;

    let (auth_url, csrf_state) = facebook.authorize_url();

    let cookie = Cookie::build((STATE_COOKIE, csrf_state.secret().clone()))
        .path("/")
        .max_age(time::Duration::minutes(10))
        .same_site(SameSite::Lax)
        .http_only(true);

    Ok((jar.add(cookie), Redirect::to(auth_url.as_str())))
}

/// Handle the provider callback: check state, exchange the code, then
/// login (or first create) the matching user.
#[utoipa::path(get, path = "/api/oauth/facebook/callback", responses(
    (status = 200, description = "Login successful.", body = LoginResponse),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 404, description = "Facebook login is not configured.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn get_facebook_callback(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<FacebookCallbackQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    let facebook = data.facebook.as_ref().ok_or_else(|| {
        build_err_resp(StatusCode::NOT_FOUND, "Facebook login is not configured.")
    })?;

    if let Some(description) = query.error_description {
        return Err(build_err_resp(StatusCode::BAD_REQUEST, description));
    }

    let expected_state = jar
        .get(STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| build_err_resp(StatusCode::BAD_REQUEST, "Missing OAuth state cookie."))?;

    if query.state.as_deref() != Some(expected_state.as_str()) {
        return Err(build_err_resp(StatusCode::BAD_REQUEST, "OAuth state mismatch."));
    }

    let code = query
        .code
        .ok_or_else(|| build_err_resp(StatusCode::BAD_REQUEST, "Missing authorization code."))?;

    let access_token = facebook
        .exchange_code(code)
        .await
        .map_err(|e| build_err_resp(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let profile = facebook
        .fetch_profile(&access_token)
        .await
        .map_err(|e| build_err_resp(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let email = profile
        .email
        .ok_or_else(|| {
            build_err_resp(
                StatusCode::BAD_REQUEST,
                "Facebook did not share an email address for this account.",
            )
        })?
        .to_ascii_lowercase();

    let user = Users::find()
        .filter(users::Column::Email.eq(&email))
        .one(&data.db)
        .await
        .map_err(|e| {
            build_err_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch user from database. Database error: {}", e),
            )
        })?;

    let user = match user {
        Some(user) => user,
        None => {
            // first federated login: the provider already verified the
            // address, so the account starts out confirmed, with an
            // unguessable placeholder password
            let placeholder = hash_pass(&uuid::Uuid::new_v4().to_string())
                .map_err(|e| build_err_resp(StatusCode::INTERNAL_SERVER_ERROR, e))?;
            let created_at = chrono::Utc::now().to_string();

            let user = users::ActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                username: Set(profile.name.clone()),
                email: Set(email),
                password: Set(placeholder),
                is_confirmed: Set(true),
                created_at: Set(created_at.clone()),
                updated_at: Set(created_at),
            };

            user.insert(&data.db).await.map_err(|e| {
                build_err_resp(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to insert user into database. Database error: {}", e),
                )
            })?
        }
    };

    let now = chrono::Utc::now();
    let claims = TokenClaims {
        sub: user.id,
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::hours(data.env.jwt_maxage_hour)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(data.env.jwt_secret.as_ref()),
    )
    .map_err(|e| {
        build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to generate token. JWT error: {}", e),
        )
    })?;

    let session_cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(time::Duration::hours(data.env.jwt_maxage_hour))
        .same_site(SameSite::Lax)
        .http_only(true);

    let clear_state = Cookie::build((STATE_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::seconds(0));

    let jar = jar.add(session_cookie).add(clear_state);

    Ok((
        jar,
        Json(ApiResponse {
            description: String::from("Login successful."),
            body: Some(LoginResponseBody { token }),
        }),
    ))
}
