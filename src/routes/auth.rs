use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{
        LoginPayload, MessageResponse, RegisterPayload, RegisterResponse, ResendCodePayload,
        TokenResponse, VerifyEmailPayload, VerifyRegistrationPayload,
    },
    error::Result,
    models::account::Account,
    AppState,
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Pending registration created, code emailed", body = Json<RegisterResponse>),
        (status = 400, description = "Invalid payload or email domain"),
        (status = 404, description = "Institution not found"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let pending = state.auth_service.begin_registration(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "We sent a verification code to your email".to_string(),
            email: pending.email,
            requires_verification: true,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/verify-registration",
    request_body = VerifyRegistrationPayload,
    responses(
        (status = 200, description = "Account created and token issued", body = Json<TokenResponse>),
        (status = 400, description = "Invalid or expired code"),
        (status = 404, description = "No pending registration")
    )
)]
#[axum::debug_handler]
pub async fn verify_registration(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRegistrationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state
        .auth_service
        .complete_registration(&payload.email, &payload.code)
        .await?;
    Ok(Json(TokenResponse::bearer(
        session.access_token,
        session.account,
    )))
}

#[utoipa::path(
    post,
    path = "/auth/resend-registration-code",
    request_body = ResendCodePayload,
    responses(
        (status = 200, description = "New code emailed", body = Json<MessageResponse>),
        (status = 404, description = "No pending registration")
    )
)]
#[axum::debug_handler]
pub async fn resend_registration_code(
    State(state): State<AppState>,
    Json(payload): Json<ResendCodePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let pending = state.auth_service.resend_code(&payload.email).await?;
    Ok(Json(MessageResponse::new(format!(
        "A new code was sent to {}",
        pending.email
    ))))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token issued", body = Json<TokenResponse>),
        (status = 401, description = "Incorrect email or password"),
        (status = 403, description = "Account deactivated")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(TokenResponse::bearer(
        session.access_token,
        session.account,
    )))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current account", body = Json<Account>),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn me(Extension(account): Extension<Account>) -> Result<impl IntoResponse> {
    Ok(Json(account))
}

#[utoipa::path(
    post,
    path = "/auth/send-verification",
    responses(
        (status = 200, description = "Verification code emailed", body = Json<MessageResponse>),
        (status = 400, description = "Account already verified")
    )
)]
#[axum::debug_handler]
pub async fn send_verification(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<impl IntoResponse> {
    state.auth_service.send_account_verification(&account).await?;
    Ok(Json(MessageResponse::new(format!(
        "Verification code sent to {}",
        account.email
    ))))
}

#[utoipa::path(
    post,
    path = "/auth/resend-verification",
    responses(
        (status = 200, description = "Verification code emailed", body = Json<MessageResponse>),
        (status = 400, description = "Account already verified")
    )
)]
#[axum::debug_handler]
pub async fn resend_verification(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<impl IntoResponse> {
    state.auth_service.send_account_verification(&account).await?;
    Ok(Json(MessageResponse::new(format!(
        "New verification code sent to {}",
        account.email
    ))))
}

#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailPayload,
    responses(
        (status = 200, description = "Email verified", body = Json<MessageResponse>),
        (status = 400, description = "Invalid or expired code")
    )
)]
#[axum::debug_handler]
pub async fn verify_email(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(payload): Json<VerifyEmailPayload>,
) -> Result<impl IntoResponse> {
    if account.is_verified {
        return Ok(Json(MessageResponse::new("Your email is already verified")));
    }
    payload.validate()?;
    state
        .auth_service
        .verify_account_email(&account, &payload.code)
        .await?;
    Ok(Json(MessageResponse::new("Email verified successfully")))
}
