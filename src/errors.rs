use crate::shell::ShellError;
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    /// The upstream tank service failed us; the message says how.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    pub fn unknown_tank(tank_id: &str) -> Self {
        Self::not_found(format!("no tank with id '{tank_id}'"))
    }
}

impl From<ShellError> for AppError {
    fn from(err: ShellError) -> Self {
        let status = match &err {
            ShellError::UnknownTank(tank_id) => return Self::unknown_tank(tank_id),
            ShellError::TankClosed(_) => StatusCode::CONFLICT,
            ShellError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
