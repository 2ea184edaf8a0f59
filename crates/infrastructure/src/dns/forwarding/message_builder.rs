//! PTR query construction in wire format using `hickory-proto`.

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use rdns_cache_domain::DomainError;
use std::net::IpAddr;
use std::str::FromStr;

pub struct MessageBuilder;

impl MessageBuilder {
    /// `in-addr.arpa` / `ip6.arpa` name for an address.
    pub fn reverse_domain(ip: &IpAddr) -> String {
        match ip {
            IpAddr::V4(ipv4) => {
                let octets = ipv4.octets();
                format!(
                    "{}.{}.{}.{}.in-addr.arpa.",
                    octets[3], octets[2], octets[1], octets[0]
                )
            }
            IpAddr::V6(ipv6) => {
                let mut nibbles = Vec::with_capacity(32);
                for byte in ipv6.octets().iter().rev() {
                    nibbles.push(format!("{:x}", byte & 0x0f));
                    nibbles.push(format!("{:x}", (byte >> 4) & 0x0f));
                }
                format!("{}.ip6.arpa.", nibbles.join("."))
            }
        }
    }

    /// Build a recursive PTR query for `ip`, returning the message id used
    /// for response matching along with the serialized bytes.
    pub fn build_ptr_query(ip: &IpAddr) -> Result<(u16, Vec<u8>), DomainError> {
        let reverse = Self::reverse_domain(ip);
        let name = Name::from_str(&reverse).map_err(|e| {
            DomainError::InvalidIpAddress(format!("Invalid reverse name '{}': {}", reverse, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordType::PTR);
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);
        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let mut buf = Vec::with_capacity(128);
        let mut encoder = BinEncoder::new(&mut buf);
        message.emit(&mut encoder).map_err(|e| {
            DomainError::IoError(format!("Failed to serialize PTR query: {}", e))
        })?;

        Ok((id, buf))
    }
}
