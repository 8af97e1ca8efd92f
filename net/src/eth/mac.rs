// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mac address type and logic.

use arrayvec::ArrayVec;
use std::fmt::Display;
use std::net::Ipv6Addr;
use std::str::FromStr;

/// A [MAC Address] type.
///
/// `Mac` is a transparent wrapper around `[u8; 6]` which provides a
/// small collection of methods and type safety.
///
/// [MAC Address]: https://en.wikipedia.org/wiki/MAC_address
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Mac(pub [u8; 6]);

impl From<[u8; 6]> for Mac {
    fn from(value: [u8; 6]) -> Self {
        Mac(value)
    }
}

impl From<Mac> for [u8; 6] {
    fn from(value: Mac) -> Self {
        value.0
    }
}

impl AsRef<[u8; 6]> for Mac {
    fn as_ref(&self) -> &[u8; 6] {
        &self.0
    }
}

/// Errors which can occur while converting a string to a [`Mac`]
#[derive(Debug, thiserror::Error)]
pub enum MacFromStringError {
    /// Invalid string representation of mac address
    #[error("invalid string representation of mac address: {0}")]
    Invalid(String),
}

impl TryFrom<&str> for Mac {
    type Error = MacFromStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        const MAX_OCTETS: usize = 6;
        let mut octets_strs = value.split(':');
        let octets_parsed =
            octets_strs.try_fold(ArrayVec::<_, MAX_OCTETS>::new(), |mut acc, octet_str| {
                if octet_str.len() != 2 {
                    return Err(MacFromStringError::Invalid(value.to_string()));
                }
                if octet_str.chars().any(|c| !c.is_ascii_hexdigit()) {
                    return Err(MacFromStringError::Invalid(value.to_string()));
                }
                let parsed = u8::from_str_radix(octet_str, 16)
                    .map_err(|_| MacFromStringError::Invalid(value.to_string()))?;
                acc.try_push(parsed)
                    .map_err(|_| MacFromStringError::Invalid(value.to_string()))?;
                Ok(acc)
            })?;

        let octets = match octets_parsed.as_slice() {
            [o0, o1, o2, o3, o4, o5] => [*o0, *o1, *o2, *o3, *o4, *o5],
            _ => return Err(MacFromStringError::Invalid(value.to_string())),
        };

        Ok(Mac(octets))
    }
}

impl FromStr for Mac {
    type Err = MacFromStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mac::try_from(s)
    }
}

impl Mac {
    /// The broadcast `Mac`
    pub const BROADCAST: Mac = Mac([u8::MAX; 6]);
    /// The zero `Mac`.
    ///
    /// `ZERO` is illegal as a source or destination `Mac` in most contexts.
    pub const ZERO: Mac = Mac([0; 6]);

    /// Returns true iff the binary representation of the [`Mac`] is exclusively ones.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self == &Mac::BROADCAST
    }

    /// Returns true iff the least significant bit of the first octet of the [`Mac`] is one.
    #[must_use]
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }

    /// Returns true iff the least significant bit of the first octet of the [`Mac`] is zero.
    #[must_use]
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    /// Returns true iff the binary representation of the [`Mac`] is exclusively zeros.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self == &Mac::ZERO
    }

    /// Derive the modified-EUI-64 IPv6 link-local address of this [`Mac`].
    ///
    /// The interface identifier is the MAC with the universal/local bit
    /// flipped and `ff:fe` spliced into the middle, prefixed with `fe80::/64`.
    #[must_use]
    pub fn link_local_ipv6(&self) -> Ipv6Addr {
        let m = self.0;
        Ipv6Addr::new(
            0xfe80,
            0,
            0,
            0,
            u16::from_be_bytes([m[0] ^ 0x02, m[1]]),
            u16::from_be_bytes([m[2], 0xff]),
            u16::from_be_bytes([0xfe, m[3]]),
            u16::from_be_bytes([m[4], m[5]]),
        )
    }
}

impl Display for Mac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mac_parses_from_string() {
        let mac = Mac::try_from("00:02:c9:ab:00:01").unwrap();
        assert_eq!(mac, Mac([0x00, 0x02, 0xc9, 0xab, 0x00, 0x01]));
    }

    #[test]
    fn mac_rejects_malformed_strings() {
        for bad in ["", "00:02:c9:ab:00", "00:02:c9:ab:00:01:02", "00:02:c9:ab:00:zz", "0:2:c9:ab:0:1"] {
            match Mac::try_from(bad) {
                Err(MacFromStringError::Invalid(s)) => assert_eq!(s, bad),
                Ok(mac) => unreachable!("Mac::try_from({bad:?}) should have failed, got {mac}"),
            }
        }
    }

    #[test]
    fn mac_display_roundtrips() {
        let text = "52:54:00:12:34:56";
        let mac = Mac::try_from(text).unwrap();
        assert_eq!(mac.to_string(), text);
        assert_eq!(Mac::try_from(mac.to_string().as_str()).unwrap(), mac);
    }

    #[test]
    fn link_local_derivation_flips_local_bit_and_splices_fffe() {
        let mac = Mac([0x02, 0x01, 0x02, 0x03, 0x04, 0x05]);
        let expect: Ipv6Addr = "fe80::1:2ff:fe03:405".parse().unwrap();
        assert_eq!(mac.link_local_ipv6(), expect);

        let mac = Mac([0x00, 0x02, 0xc9, 0xab, 0x00, 0x01]);
        let expect: Ipv6Addr = "fe80::202:c9ff:feab:1".parse().unwrap();
        assert_eq!(mac.link_local_ipv6(), expect);
    }

    #[test]
    fn mac_display_roundtrips_for_arbitrary_octets() {
        bolero::check!().with_type::<[u8; 6]>().for_each(|octets| {
            let mac = Mac(*octets);
            let parsed = Mac::try_from(mac.to_string().as_str()).unwrap();
            assert_eq!(parsed, mac);
        });
    }
}
