use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0} Not Found")]
    NotFound(String),

    #[error("upload failed: {0}")]
    Upload(#[from] std::io::Error),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedPayload => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            AppError::Upload(_) | AppError::Store(_) => {
                error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something broke!").into_response()
            }
        }
    }
}
