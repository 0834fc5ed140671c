//! Conversion between multiaddrs and host connection parameters.
//!
//! Only the thin-waist shape (`/ip4|ip6/<addr>/tcp|udp/<port>`) maps onto
//! host parameters. Nothing here opens a socket.

use super::Multiaddr;
use crate::core::{convert, Segment};
use crate::error::{MultiaddrError, Result};
use crate::protocol::table::{DNS, DNS4, DNS6, IP4, IP6, TCP, UDP};
use crate::protocol::{self, ValueFormat};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// Address family of a [`NetOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Ipv4 => "ipv4",
            Family::Ipv6 => "ipv6",
        }
    }

    /// Numeric family, `4` or `6`.
    pub fn number(self) -> u8 {
        match self {
            Family::Ipv4 => 4,
            Family::Ipv6 => 6,
        }
    }
}

/// Host parameters of a thin-waist address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    /// `4` or `6`
    pub family: u8,
    pub address: String,
    pub port: u16,
}

impl NodeAddress {
    /// Socket address for the host network stack.
    pub fn to_socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.address.parse().map_err(|_| {
            MultiaddrError::InvalidFormat(format!("'{}' is not an IP address", self.address))
        })?;
        let expected = if ip.is_ipv4() { 4 } else { 6 };
        if self.family != expected {
            return Err(MultiaddrError::InvalidFormat(format!(
                "family {} does not match address {}",
                self.family, self.address
            )));
        }
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Connection options for a network layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetOptions {
    pub family: Family,
    pub host: String,
    pub transport: String,
    pub port: u16,
}

fn is_transport(code: u32) -> bool {
    code == TCP || code == UDP
}

fn port_of(segment: &Segment<'_>) -> Result<u16> {
    convert::port_from_bytes(segment.protocol, &segment.value)
}

fn host_of(segment: &Segment<'_>) -> Result<String> {
    convert::value_to_string(segment.protocol, &segment.value)
}

impl Multiaddr {
    /// Whether the address is exactly `/ip4|ip6/<addr>/tcp|udp/<port>`.
    pub fn is_thin_waist(&self) -> bool {
        let codes = self.proto_codes();
        matches!(codes.as_slice(), [net, transport] if (*net == IP4 || *net == IP6) && is_transport(*transport))
    }

    /// Host parameters of a thin-waist address.
    ///
    /// # Errors
    /// `NotThinWaist` for any other shape.
    pub fn node_address(&self) -> Result<NodeAddress> {
        if !self.is_thin_waist() {
            return Err(MultiaddrError::NotThinWaist(self.to_string()));
        }
        let segments: Vec<Segment<'_>> = self.iter().collect();
        let (net, transport) = match segments.as_slice() {
            [net, transport] => (net, transport),
            _ => return Err(MultiaddrError::NotThinWaist(self.to_string())),
        };
        Ok(NodeAddress {
            family: if net.code() == IP4 { 4 } else { 6 },
            address: host_of(net)?,
            port: port_of(transport)?,
        })
    }

    /// Connection options from the first two segments.
    ///
    /// The host may be an IP literal or a DNS name; `dns` and `dns4` map to
    /// IPv4, `dns6` to IPv6. Segments after the transport are ignored.
    ///
    /// # Errors
    /// `NotThinWaist` when the address does not start with a host followed by
    /// `tcp` or `udp`.
    pub fn to_options(&self) -> Result<NetOptions> {
        let mut iter = self.iter();
        let (net, transport) = match (iter.next(), iter.next()) {
            (Some(net), Some(transport)) if is_transport(transport.code()) => (net, transport),
            _ => return Err(MultiaddrError::NotThinWaist(self.to_string())),
        };
        let family = match net.code() {
            IP4 | DNS | DNS4 => Family::Ipv4,
            IP6 | DNS6 => Family::Ipv6,
            _ => return Err(MultiaddrError::NotThinWaist(self.to_string())),
        };
        Ok(NetOptions {
            family,
            host: host_of(&net)?,
            transport: transport.protocol.name.clone(),
            port: port_of(&transport)?,
        })
    }

    /// Build `/ip4|ip6/<address>/<transport>/<port>` from host parameters.
    pub fn from_node_address(node: &NodeAddress, transport: &str) -> Result<Multiaddr> {
        let net = match node.family {
            4 => protocol::by_code(IP4)?,
            6 => protocol::by_code(IP6)?,
            other => {
                return Err(MultiaddrError::InvalidFormat(format!(
                    "unsupported address family {other}"
                )))
            }
        };
        let transport = protocol::by_name(transport)?;
        if transport.format != ValueFormat::Port {
            return Err(MultiaddrError::InvalidFormat(format!(
                "{} is not a port-addressed transport",
                transport.name
            )));
        }

        let segments = [
            Segment::new(net, convert::value_from_str(net, &node.address)?),
            Segment::new(transport, node.port.to_be_bytes().to_vec()),
        ];
        Multiaddr::from_segments(&segments)
    }

    /// Build a thin-waist address from a socket address.
    pub fn from_socket_addr(addr: SocketAddr, transport: &str) -> Result<Multiaddr> {
        let node = NodeAddress {
            family: if addr.is_ipv4() { 4 } else { 6 },
            address: addr.ip().to_string(),
            port: addr.port(),
        };
        Multiaddr::from_node_address(&node, transport)
    }
}

impl TryFrom<SocketAddr> for Multiaddr {
    type Error = MultiaddrError;

    /// TCP address for `addr`.
    fn try_from(addr: SocketAddr) -> Result<Self> {
        Multiaddr::from_socket_addr(addr, "tcp")
    }
}
