use async_trait::async_trait;
use rdns_cache_application::ports::ResolutionProvider;
use rdns_cache_domain::DomainError;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

use super::forwarding::{MessageBuilder, PtrAnswer, ResponseParser};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Resolves addresses with a PTR query over UDP to a single upstream server.
pub struct PtrResolutionProvider {
    server: SocketAddr,
    timeout: Duration,
}

impl PtrResolutionProvider {
    pub fn new(server: SocketAddr, timeout: Duration) -> Self {
        Self { server, timeout }
    }

    fn transient(ip: IpAddr, reason: impl Into<String>) -> DomainError {
        DomainError::ResolutionTransient {
            ip,
            reason: reason.into(),
        }
    }

    async fn exchange(&self, ip: IpAddr, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if self.server.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| Self::transient(ip, format!("failed to bind UDP socket: {}", e)))?;

        socket
            .send_to(query, self.server)
            .await
            .map_err(|e| Self::transient(ip, format!("send to {} failed: {}", self.server, e)))?;

        // One deadline for the whole exchange, stray datagrams included
        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let (len, from) = tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| {
                    Self::transient(
                        ip,
                        format!("no response from {} within {}ms", self.server, self.timeout.as_millis()),
                    )
                })?
                .map_err(|e| Self::transient(ip, format!("receive failed: {}", e)))?;

            if from.ip() != self.server.ip() {
                warn!(expected = %self.server, received_from = %from, "UDP response from unexpected source");
                continue;
            }

            recv_buf.truncate(len);
            return Ok(recv_buf);
        }
    }
}

#[async_trait]
impl ResolutionProvider for PtrResolutionProvider {
    async fn resolve(&self, ip: IpAddr) -> Result<String, DomainError> {
        let (id, query) = MessageBuilder::build_ptr_query(&ip)?;

        debug!(ip = %ip, server = %self.server, "Performing PTR lookup");

        let response = self.exchange(ip, &query).await?;
        let answer = ResponseParser::parse_ptr(id, &response)
            .map_err(|e| Self::transient(ip, e.to_string()))?;

        match answer {
            PtrAnswer::Hostname(hostname) => {
                debug!(ip = %ip, hostname = %hostname, "PTR lookup successful");
                Ok(hostname)
            }
            PtrAnswer::NoRecord => {
                debug!(ip = %ip, "PTR lookup returned no records");
                Err(DomainError::HostnameNotFound(ip))
            }
            PtrAnswer::Truncated => Err(Self::transient(ip, "truncated response")),
            PtrAnswer::ServerFailure(rcode) => {
                Err(Self::transient(ip, format!("upstream answered {:?}", rcode)))
            }
        }
    }
}
