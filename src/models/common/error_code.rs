use crate::errors::CampusError;

// 业务响应码，与 HTTP 状态码保持一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 200,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    Conflict = 409,
    UnprocessableEntity = 422,
    Locked = 423,
    InternalServerError = 500,
    BadGateway = 502,
}

impl From<&CampusError> for ErrorCode {
    fn from(err: &CampusError) -> Self {
        match err {
            CampusError::Validation(_) => ErrorCode::UnprocessableEntity,
            CampusError::NotFound(_) => ErrorCode::NotFound,
            CampusError::Authentication(_) => ErrorCode::Unauthorized,
            CampusError::PermissionDenied(_) => ErrorCode::Forbidden,
            CampusError::Locked(_) => ErrorCode::Locked,
            CampusError::Conflict(_) => ErrorCode::Conflict,
            CampusError::Upstream(_) => ErrorCode::BadGateway,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&CampusError::locked("verrouillé")),
            ErrorCode::Locked
        );
        assert_eq!(
            ErrorCode::from(&CampusError::not_found("introuvable")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&CampusError::database_operation("boom")),
            ErrorCode::InternalServerError
        );
    }
}
