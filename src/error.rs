use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Reqwest(reqwest::Error),
    SerdeJson(serde_json::Error),
    TimeFormat(time::error::Format),
    Template(minijinja::Error),
    // Stored as text, the source error is not Send
    Multipart(String),
    Blocking(BlockingError),
    InvalidInput(String),
    BoundaryFetch(String),
    CLI(String),
    Generic(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IO(err) => err.fmt(f),
            Error::Reqwest(err) => err.fmt(f),
            Error::SerdeJson(err) => err.fmt(f),
            Error::TimeFormat(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Multipart(err) => write!(f, "{}", err),
            Error::Blocking(err) => err.fmt(f),
            Error::InvalidInput(err) => write!(f, "{}", err),
            Error::BoundaryFetch(err) => write!(f, "{}", err),
            Error::CLI(err) => write!(f, "{}", err),
            Error::Generic(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<&str> for Error {
    fn from(str: &str) -> Self {
        Error::Generic(str.to_owned())
    }
}

impl From<String> for Error {
    fn from(str: String) -> Self {
        Error::Generic(str)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Reqwest(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerdeJson(error)
    }
}

impl From<time::error::Format> for Error {
    fn from(error: time::error::Format) -> Self {
        Error::TimeFormat(error)
    }
}

impl From<minijinja::Error> for Error {
    fn from(error: minijinja::Error) -> Self {
        Error::Template(error)
    }
}

impl From<actix_multipart::MultipartError> for Error {
    fn from(error: actix_multipart::MultipartError) -> Self {
        Error::Multipart(error.to_string())
    }
}

impl From<BlockingError> for Error {
    fn from(error: BlockingError) -> Self {
        Error::Blocking(error)
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub http_code: u16,
    pub message: String,
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiError {
            http_code: self.status_code().as_u16(),
            message: self.to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::BoundaryFetch(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
