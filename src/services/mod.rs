pub mod auth;
pub mod curriculum;
pub mod dashboard;
pub mod enrollments;
pub mod grading;
pub mod media;
pub mod messenger;
pub mod results;
pub mod websocket;

pub use auth::AuthService;
pub use curriculum::CurriculumService;
pub use dashboard::DashboardService;
pub use enrollments::EnrollmentService;
pub use grading::GradingService;
pub use media::MediaService;
pub use messenger::MessengerService;
pub use results::ResultService;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::errors::CampusError;
use crate::models::{ApiResponse, ErrorCode};

/// 业务错误到 HTTP 响应的统一映射，状态码取自 ErrorCode
pub(crate) fn error_response(err: &CampusError) -> HttpResponse {
    let code = ErrorCode::from(err);
    let status =
        StatusCode::from_u16(code as u16).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ApiResponse::<()>::error_empty(code, err.message()))
}
