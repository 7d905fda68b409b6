use shared_types::AppError;

/// Convert a reqwest::Error into an AppError.
pub fn reqwest_to_app_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        return AppError::timeout("Backend request timed out");
    }
    if err.is_connect() {
        return AppError::upstream(format!("Backend unreachable: {err}"));
    }
    if err.is_decode() {
        return AppError::upstream(format!("Malformed backend response: {err}"));
    }
    if let Some(status) = err.status() {
        return AppError::from_upstream(status.as_u16(), &err.to_string());
    }
    AppError::upstream(err.to_string())
}

/// Extension trait providing `.into_app_error()` on reqwest::Error.
pub trait ReqwestErrorExt {
    fn into_app_error(self) -> AppError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_app_error(self) -> AppError {
        reqwest_to_app_error(self)
    }
}

/// Trait for validating request DTOs before they leave the process.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
