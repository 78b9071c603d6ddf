use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::verification::send_verification_sms,
        handlers::verification::verify_sms_code,
    ),
    components(
        schemas(
            SendVerificationRequest,
            SendVerificationResponse,
            VerifyCodeRequest,
            VerifyCodeResponse,
            VerificationStatus,
            ErrorResponse,
            ApiError,
        )
    ),
    tags(
        (name = "verification", description = "SMS phone verification API"),
    ),
    info(
        title = "TIL Backend API",
        version = "1.0.0",
        description = "TIL Backend REST API documentation",
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
