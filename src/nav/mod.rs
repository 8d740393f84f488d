pub mod uri;

pub use uri::{format_record_link, parse_record_target, UriError};
