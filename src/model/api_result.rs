use crate::model::{ApiError, QuoteError};
use rocket::{
    http::{ContentType, Status},
    request::Request,
    response::{self, Responder, Response},
};
use serde::Serialize;
use std::io::Cursor;

pub enum ApiResult<T> {
    Ok(T),
    Err(ApiError),
}

impl<T> ApiResult<T> {
    pub fn new(result: Result<T, QuoteError>) -> ApiResult<T> {
        match result {
            Ok(val) => ApiResult::Ok(val),
            Err(e) => ApiResult::Err(e.into()),
        }
    }
}

impl<'r, T: Serialize> Responder<'r, 'static> for ApiResult<T> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let val = match self {
            ApiResult::Ok(val) => val,
            ApiResult::Err(e) => return e.respond_to(req),
        };

        match serde_json::to_string(&val) {
            Ok(body) => Response::build()
                .header(ContentType::JSON)
                .status(Status::Ok)
                .sized_body(body.len(), Cursor::new(body))
                .ok(),
            Err(e) => ApiError::from(QuoteError::Encoding(e)).respond_to(req),
        }
    }
}
