use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid {key} value: {message}")]
    Config { key: &'static str, message: String },

    #[error("Failed to bind: {0}")]
    Bind(#[source] io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] io::Error),
}
