use crate::model::QuoteError;
use rocket::{
    http::{ContentType, Status},
    request::Request,
    response::{self, Responder, Response},
};
use std::io::Cursor;
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    pub error: Option<QuoteError>,
}

impl ApiError {
    pub fn custom(code: u16, message: &str) -> ApiError {
        ApiError {
            code,
            message: message.to_string(),
            error: None,
        }
    }
}

impl From<QuoteError> for ApiError {
    fn from(error: QuoteError) -> Self {
        let (status, message) = match &error {
            QuoteError::DeadlineExceeded => {
                (Status::RequestTimeout, "Request timeout, please try again.")
            }
            QuoteError::Fetch(_) => (
                Status::InternalServerError,
                "Failed to get latest USD to BRL rate.",
            ),
            QuoteError::Persistence(_) => (
                Status::InternalServerError,
                "Failed to insert currency into DB.",
            ),
            QuoteError::Encoding(_) => (
                Status::InternalServerError,
                "Failed to process the request due to an internal error.",
            ),
        };

        ApiError {
            code: status.code,
            message: message.to_string(),
            error: Some(error),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        if let Some(error) = &self.error {
            error!(code = self.code, %error, "Error from controller");
        }

        let body = serde_json::json!({ "message": self.message }).to_string();

        Response::build()
            .header(ContentType::JSON)
            .status(Status::new(self.code))
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
