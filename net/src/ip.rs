// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IP network helpers: CIDR parsing and mask application.

use ipnet::IpNet;
use std::net::IpAddr;
use thiserror::Error;

/// Mask length of derived IPv6 link-local interface addresses.
pub const LINK_LOCAL_MASK_LEN: u8 = 64;

/// Errors which can occur while parsing a network string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkParseError {
    #[error("invalid IP network: {0}")]
    Invalid(String),
    #[error("invalid mask length in network: {0}")]
    BadMaskLength(String),
}

/// Maximum mask length for the address family of `addr`.
#[must_use]
pub fn max_mask_len(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

/// Parse `"addr/len"` (or a bare `"addr"`, yielding a full-length mask) into
/// an `(address, mask length)` pair. Host bits are retained.
pub fn parse_network(value: &str) -> Result<(IpAddr, u8), NetworkParseError> {
    let (addr_str, mask_str) = match value.split_once('/') {
        Some((a, m)) => (a, Some(m)),
        None => (value, None),
    };
    let addr: IpAddr = addr_str
        .parse()
        .map_err(|_| NetworkParseError::Invalid(value.to_string()))?;
    let mask = match mask_str {
        Some(m) => {
            let mask: u8 = m
                .parse()
                .map_err(|_| NetworkParseError::BadMaskLength(value.to_string()))?;
            if mask > max_mask_len(addr) {
                return Err(NetworkParseError::BadMaskLength(value.to_string()));
            }
            mask
        }
        None => max_mask_len(addr),
    };
    Ok((addr, mask))
}

/// Zero the host bits of `addr` under a mask of `len` bits.
#[must_use]
pub fn mask_network(addr: IpAddr, len: u8) -> IpAddr {
    IpNet::new(addr, len).map_or(addr, |net| net.network())
}

/// Tell if an address is an IPv6 link-local (`fe80::/10`) address.
#[must_use]
pub fn is_ipv6_link_local(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(_) => false,
        IpAddr::V6(a) => (a.segments()[0] & 0xffc0) == 0xfe80,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_network_with_mask() {
        let (addr, mask) = parse_network("10.0.0.1/24").unwrap();
        assert_eq!(addr, "10.0.0.1".parse::<IpAddr>().unwrap());
        assert_eq!(mask, 24);
    }

    #[test]
    fn parse_network_bare_address_gets_full_mask() {
        assert_eq!(parse_network("10.0.0.1").unwrap().1, 32);
        assert_eq!(parse_network("2401:db00::1").unwrap().1, 128);
    }

    #[test]
    fn parse_network_rejects_garbage() {
        assert!(matches!(
            parse_network("not-an-address/24"),
            Err(NetworkParseError::Invalid(_))
        ));
        assert!(matches!(
            parse_network("10.0.0.1/33"),
            Err(NetworkParseError::BadMaskLength(_))
        ));
        assert!(matches!(
            parse_network("10.0.0.1/x"),
            Err(NetworkParseError::BadMaskLength(_))
        ));
    }

    #[test]
    fn mask_network_zeroes_host_bits() {
        let addr: IpAddr = "10.1.2.3".parse().unwrap();
        assert_eq!(mask_network(addr, 24), "10.1.2.0".parse::<IpAddr>().unwrap());
        let addr: IpAddr = "2401:db00::1".parse().unwrap();
        assert_eq!(mask_network(addr, 64), "2401:db00::".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn v6_link_local_detection() {
        assert!(is_ipv6_link_local("fe80::1".parse().unwrap()));
        assert!(!is_ipv6_link_local("2401:db00::1".parse().unwrap()));
        assert!(!is_ipv6_link_local("169.254.0.1".parse().unwrap()));
    }
}
