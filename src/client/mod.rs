pub mod http;
pub mod payload;
pub mod traits;

pub use http::HttpHistoryClient;
pub use payload::decode_history_page;
pub use traits::*;
