use crate::domain::RecordIdentity;

const SCHEME: &str = "rowlog";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
    #[error("invalid scheme")]
    InvalidScheme,
    #[error("invalid path")]
    InvalidPath,
    #[error("empty identifier")]
    EmptySegment,
}

/// Parses a record target typed by the user. Accepts either the short
/// `<base>/<table>/<record>` form or a deep link of the shape
/// `rowlog://base/<base>/table/<table>/record/<record>`.
pub fn parse_record_target(input: &str) -> Result<RecordIdentity, UriError> {
    let input = input.trim();
    match input.split_once("://") {
        Some((scheme, rest)) => {
            if scheme != SCHEME {
                return Err(UriError::InvalidScheme);
            }
            parse_deep_link_path(rest)
        }
        None => parse_short_form(input),
    }
}

pub fn format_record_link(identity: &RecordIdentity) -> String {
    format!(
        "{}://base/{}/table/{}/record/{}",
        SCHEME,
        percent_encode(&identity.base_id),
        percent_encode(&identity.table_id),
        percent_encode(&identity.record_id),
    )
}

fn parse_short_form(input: &str) -> Result<RecordIdentity, UriError> {
    let segments: Vec<String> = input.split('/').map(percent_decode).collect();
    match segments.as_slice() {
        [base, table, record] => build_identity(base, table, record),
        _ => Err(UriError::InvalidPath),
    }
}

fn parse_deep_link_path(rest: &str) -> Result<RecordIdentity, UriError> {
    let path = rest.split(['?', '#']).next().unwrap_or("");
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(percent_decode)
        .collect();

    match segments.as_slice() {
        [b, base, t, table, r, record] if b == "base" && t == "table" && r == "record" => {
            build_identity(base, table, record)
        }
        _ => Err(UriError::InvalidPath),
    }
}

fn build_identity(base: &str, table: &str, record: &str) -> Result<RecordIdentity, UriError> {
    if base.is_empty() || table.is_empty() || record.is_empty() {
        return Err(UriError::EmptySegment);
    }
    Ok(RecordIdentity::new(base, table, record))
}

fn percent_encode(input: &str) -> String {
    let mut out = String::new();
    for b in input.as_bytes() {
        match *b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(*b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push(((hi << 4) + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
