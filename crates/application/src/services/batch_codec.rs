//! Payload format shared by the request and ingest topics: addresses
//! separated by ASCII whitespace.

use bytes::Bytes;
use rdns_cache_domain::{DomainError, QueueItem};
use std::net::IpAddr;

/// Tokens of one payload, split into parsed addresses (in payload order) and
/// tokens that are not IP addresses.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DecodedBatch {
    pub addresses: Vec<IpAddr>,
    pub rejected: Vec<String>,
}

pub fn encode_batch(items: &[QueueItem]) -> Bytes {
    let joined = items
        .iter()
        .map(|item| item.ip_address.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    Bytes::from(joined)
}

/// Fails with `MalformedBatch` only when the payload is not UTF-8.
pub fn decode_batch(payload: &[u8]) -> Result<DecodedBatch, DomainError> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| DomainError::MalformedBatch(format!("payload is not UTF-8: {}", e)))?;

    let mut decoded = DecodedBatch::default();
    for token in text.split_ascii_whitespace() {
        match token.parse::<IpAddr>() {
            Ok(ip) => decoded.addresses.push(ip),
            Err(_) => decoded.rejected.push(token.to_string()),
        }
    }
    Ok(decoded)
}
