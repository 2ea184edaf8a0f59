use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use rdns_cache_domain::DomainError;
use tracing::debug;

/// What a PTR response says about an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PtrAnswer {
    Hostname(String),
    /// NXDOMAIN, or NOERROR without a PTR record
    NoRecord,
    /// Truncated without a usable answer
    Truncated,
    ServerFailure(ResponseCode),
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse_ptr(expected_id: u16, response_bytes: &[u8]) -> Result<PtrAnswer, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::IoError(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.id() != expected_id {
            return Err(DomainError::IoError(format!(
                "DNS response id {} does not match query id {}",
                message.id(),
                expected_id
            )));
        }

        let rcode = message.response_code();
        debug!(rcode = ?rcode, answers = message.answers().len(), "PTR response parsed");

        match rcode {
            ResponseCode::NoError => {}
            ResponseCode::NXDomain => return Ok(PtrAnswer::NoRecord),
            other => return Ok(PtrAnswer::ServerFailure(other)),
        }

        for record in message.answers() {
            if let RData::PTR(ptr) = record.data() {
                return Ok(PtrAnswer::Hostname(ptr.to_utf8()));
            }
        }

        if message.truncated() {
            Ok(PtrAnswer::Truncated)
        } else {
            Ok(PtrAnswer::NoRecord)
        }
    }
}
