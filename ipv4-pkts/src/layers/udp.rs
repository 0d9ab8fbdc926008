// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The User Datagram Protocol (UDP).

use core::fmt;

use crate::error::DecodeError;
use crate::layers::traits::*;
use crate::utils;

pub const UDP_HEADER_LEN: usize = 8;

/// A decoded UDP (User Datagram Protocol) packet.
///
/// The Length field is exposed as declared and is never compared against the number of bytes
/// actually present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UdpRef<'a> {
    header: &'a [u8; UDP_HEADER_LEN],
    payload: &'a [u8],
}

impl<'a> UdpRef<'a> {
    #[inline]
    pub fn sport(&self) -> u16 {
        utils::be_u16(self.header, 0)
    }

    #[inline]
    pub fn dport(&self) -> u16 {
        utils::be_u16(self.header, 2)
    }

    /// The length of the UDP header and payload, as advertised by the header.
    #[inline]
    pub fn packet_length(&self) -> u16 {
        utils::be_u16(self.header, 4)
    }

    #[inline]
    pub fn chksum(&self) -> u16 {
        utils::be_u16(self.header, 6)
    }

    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

impl LayerName for UdpRef<'_> {
    #[inline]
    fn name() -> &'static str {
        "UDP"
    }
}

impl<'a> FromBytesRef<'a> for UdpRef<'a> {
    #[inline]
    fn from_bytes(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let (header, payload) = utils::split_array::<UDP_HEADER_LEN>(bytes).ok_or(
            DecodeError::truncated(
                Self::name(),
                "insufficient bytes in UDP header (8 bytes required)",
            ),
        )?;

        Ok(UdpRef { header, payload })
    }
}

impl PacketLength for UdpRef<'_> {
    #[inline]
    fn header_length(&self) -> usize {
        UDP_HEADER_LEN
    }

    #[inline]
    fn data_length(&self) -> isize {
        self.payload.len() as isize
    }
}

impl fmt::Display for UdpRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UDP from {} to {}", self.sport(), self.dport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorClass;

    const DNS_QUERY: [u8; 12] = [
        0xe1, 0x15, 0x00, 0x35, 0x00, 0x0c, 0xbe, 0xef, 0xde, 0xad, 0x01, 0x00,
    ];

    #[test]
    fn decodes_header() {
        let udp = UdpRef::from_bytes(&DNS_QUERY).unwrap();
        assert_eq!(udp.sport(), 57621);
        assert_eq!(udp.dport(), 53);
        assert_eq!(udp.packet_length(), 12);
        assert_eq!(udp.chksum(), 0xbeef);
        assert_eq!(udp.payload(), &[0xde, 0xad, 0x01, 0x00]);
        assert_eq!(udp.header_length(), 8);
        assert_eq!(udp.data_length(), 4);
        assert_eq!(udp.to_string(), "UDP from 57621 to 53");
    }

    #[test]
    fn declared_length_is_not_checked() {
        let mut bytes = DNS_QUERY;
        bytes[4..6].copy_from_slice(&0xffffu16.to_be_bytes());
        let udp = UdpRef::from_bytes(&bytes).unwrap();
        assert_eq!(udp.packet_length(), 0xffff);
        assert_eq!(udp.data_length(), 4);
    }

    #[test]
    fn header_only() {
        let udp = UdpRef::from_bytes(&DNS_QUERY[..8]).unwrap();
        assert_eq!(udp.data_length(), 0);
        assert!(udp.payload().is_empty());
    }

    #[test]
    fn short_header_is_truncated() {
        let err = UdpRef::from_bytes(&DNS_QUERY[..7]).unwrap_err();
        assert_eq!(err.class, DecodeErrorClass::TruncatedHeader);
        assert_eq!(err.layer, "UDP");
        assert!(UdpRef::validate(&[]).is_err());
    }
}
