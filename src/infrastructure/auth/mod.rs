pub mod api_key;
pub mod request_id;

pub use api_key::{api_key_middleware, ApiCaller, ApiKeyGate, X_API_KEY};
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
