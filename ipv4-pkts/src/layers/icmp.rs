// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Internet Control Message Protocol (ICMP) for IPv4.
//!
//! ICMP isn't a transport protocol, but it is carried directly by IPv4 in the same way TCP and
//! UDP are, so it is decoded alongside them.

use core::fmt;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::DecodeError;
use crate::layers::traits::*;
use crate::utils;

pub const ICMP_HEADER_LEN: usize = 8;

/// The name rendered for any type or code missing from the lookup tables.
pub const UNKNOWN_NAME: &str = "Unknown";

static ICMP_TYPE_NAMES: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (0, "Echo Reply"),
        (1, "Reserved"),
        (2, "Reserved"),
        (3, "Destination Unreachable"),
        (4, "Source Quench"),
        (5, "Redirect"),
        (8, "Echo Request"),
        (9, "Router Advertisement"),
        (10, "Router Solicitation"),
        (11, "Time Exceeded"),
        (12, "Parameter Problem: Bad IP Header"),
        (13, "Timestamp"),
        (14, "Timestamp Reply"),
        (15, "Information Request"),
        (16, "Information Reply"),
        (17, "Address Mask Request"),
        (18, "Address Mask Reply"),
        (30, "Traceroute"),
    ])
});

static ICMP_CODE_NAMES: Lazy<HashMap<(u8, u8), &'static str>> = Lazy::new(|| {
    HashMap::from([
        ((0, 0), "Echo reply"),
        // Destination Unreachable
        ((3, 0), "Destination network unreachable"),
        ((3, 1), "Destination host unreachable"),
        ((3, 2), "Destination protocol unreachable"),
        ((3, 3), "Destination port unreachable"),
        ((3, 4), "Fragmentation required, and DF flag set"),
        ((3, 5), "Source route failed"),
        ((3, 6), "Destination network unknown"),
        ((3, 7), "Destination host unknown"),
        ((3, 8), "Source host isolated"),
        ((3, 9), "Network administratively prohibited"),
        ((3, 10), "Host administratively prohibited"),
        ((3, 11), "Network unreachable for TOS"),
        ((3, 12), "Host unreachable for TOS"),
        ((3, 13), "Communication administratively prohibited"),
        ((3, 14), "Host Precedence Violation"),
        ((3, 15), "Precedence cutoff in effect"),
        // Redirect
        ((5, 0), "Redirect Datagram for the Network"),
        ((5, 1), "Redirect Datagram for the Host"),
        ((5, 2), "Redirect Datagram for the TOS & network"),
        ((5, 3), "Redirect Datagram for the TOS & host"),
        // Time Exceeded
        ((11, 0), "TTL expired in transit"),
        ((11, 1), "Fragment reassembly time exceeded"),
        // Parameter Problem
        ((12, 0), "Pointer indicates the error"),
        ((12, 1), "Missing a required option"),
        ((12, 2), "Bad length"),
    ])
});

/// The human-readable name of an ICMP message type, or `"Unknown"` if the type is unlisted.
#[inline]
pub fn icmp_type_name(icmp_type: u8) -> &'static str {
    ICMP_TYPE_NAMES
        .get(&icmp_type)
        .copied()
        .unwrap_or(UNKNOWN_NAME)
}

/// The human-readable name of an ICMP code within the given message type, or `"Unknown"` if the
/// pair is unlisted.
#[inline]
pub fn icmp_code_name(icmp_type: u8, code: u8) -> &'static str {
    ICMP_CODE_NAMES
        .get(&(icmp_type, code))
        .copied()
        .unwrap_or(UNKNOWN_NAME)
}

/// A decoded ICMP message.
///
/// ## Packet Layout
/// ```txt
///    .    Octet 0    .    Octet 1    .    Octet 2    .    Octet 3    .
///    |0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  0 |      Type     |      Code     |            Checksum           |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  4 |                         Rest of Header                        |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The "rest of header" word depends on the message type and is left opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IcmpRef<'a> {
    header: &'a [u8; ICMP_HEADER_LEN],
}

impl<'a> IcmpRef<'a> {
    #[inline]
    pub fn icmp_type(&self) -> u8 {
        self.header[0]
    }

    #[inline]
    pub fn code(&self) -> u8 {
        self.header[1]
    }

    #[inline]
    pub fn chksum(&self) -> u16 {
        utils::be_u16(self.header, 2)
    }

    #[inline]
    pub fn rest(&self) -> [u8; 4] {
        [self.header[4], self.header[5], self.header[6], self.header[7]]
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        icmp_type_name(self.icmp_type())
    }

    #[inline]
    pub fn code_name(&self) -> &'static str {
        icmp_code_name(self.icmp_type(), self.code())
    }
}

impl LayerName for IcmpRef<'_> {
    #[inline]
    fn name() -> &'static str {
        "ICMP"
    }
}

impl<'a> FromBytesRef<'a> for IcmpRef<'a> {
    #[inline]
    fn from_bytes(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let header = utils::get_array::<ICMP_HEADER_LEN>(bytes, 0).ok_or(DecodeError::truncated(
            Self::name(),
            "insufficient bytes in ICMP header (8 bytes required)",
        ))?;

        Ok(IcmpRef { header })
    }
}

// The "rest of header" word is treated as both the header and the data of an ICMP message.
impl PacketLength for IcmpRef<'_> {
    #[inline]
    fn header_length(&self) -> usize {
        4
    }

    #[inline]
    fn data_length(&self) -> isize {
        4
    }
}

impl fmt::Display for IcmpRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ICMP Type {} ({}) Code {} ({})",
            self.icmp_type(),
            self.type_name(),
            self.code(),
            self.code_name()
        )
    }
}
