//! Wildcard address construction per address family.
//!
//! Everything that depends on the IPv4/IPv6 socket address layout stays in
//! this module; callers only pick a family.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use socket2::{Domain, SockAddr};

/// Address family of a listening socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// `AF_INET`.
    V4,
    /// `AF_INET6`.
    V6,
}

impl AddressFamily {
    /// IPv4 when forced, IPv6 otherwise.
    #[must_use]
    pub const fn select(force_ipv4: bool) -> Self {
        if force_ipv4 {
            AddressFamily::V4
        } else {
            AddressFamily::V6
        }
    }

    /// The `socket2` domain to create sockets of this family with.
    #[must_use]
    pub const fn domain(self) -> Domain {
        match self {
            AddressFamily::V4 => Domain::IPV4,
            AddressFamily::V6 => Domain::IPV6,
        }
    }

    /// The "any" address of this family on `port`.
    #[must_use]
    pub fn wildcard(self, port: u16) -> SockAddr {
        let addr = match self {
            AddressFamily::V4 => SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            AddressFamily::V6 => SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
        };
        SockAddr::from(addr)
    }
}
