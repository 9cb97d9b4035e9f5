mod api_error;
pub use api_error::ApiError;
mod api_result;
pub use api_result::ApiResult;
pub mod deadline;
pub use deadline::{Deadline, Expired};
mod error;
pub use error::{ClientError, FetchError, PersistenceError, QuoteError};
mod quote;
pub use quote::{BidView, Quote, UpstreamQuote};
