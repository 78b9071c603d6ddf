use actix_web::{HttpResponse, Result, ResponseError, web};

use crate::models::*;
use crate::services::VerificationService;

#[utoipa::path(
    post,
    path = "/users/send-verification-sms",
    tag = "verification",
    request_body = SendVerificationRequest,
    responses(
        (status = 200, description = "Verification code sent", body = SendVerificationResponse),
        (status = 400, description = "Invalid phone number", body = ErrorResponse),
        (status = 500, description = "SMS provider failed", body = ErrorResponse)
    )
)]
pub async fn send_verification_sms(
    verification_service: web::Data<VerificationService>,
    request: web::Json<SendVerificationRequest>,
) -> Result<HttpResponse> {
    match verification_service
        .begin_verification(&request.phone_number)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/users/verify-sms-code",
    tag = "verification",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Validation result", body = VerifyCodeResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn verify_sms_code(
    verification_service: web::Data<VerificationService>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse> {
    match verification_service
        .validate_code(request.attempt_id, &request.phone_number, &request.code)
        .await
    {
        Ok(status) => Ok(HttpResponse::Ok().json(VerifyCodeResponse { status })),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn verification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/send-verification-sms", web::post().to(send_verification_sms))
            .route("/verify-sms-code", web::post().to(verify_sms_code)),
    );
}
