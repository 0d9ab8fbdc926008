// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Internet Protocol, version 4 (IPv4), and dispatch of its payload.

use core::fmt;
use std::net::Ipv4Addr;

use bitflags::bitflags;

use crate::error::DecodeError;
use crate::layers::traits::*;
use crate::utils;

use super::icmp::IcmpRef;
use super::tcp::TcpRef;
use super::udp::UdpRef;

/// Internet Control Message Protocol (see RFC 792)
pub const DATA_PROTO_ICMP: u8 = 0x01;
/// Transmission Control Protocol (see RFC 793)
pub const DATA_PROTO_TCP: u8 = 0x06;
/// User Datagram Protocol (see RFC 768)
pub const DATA_PROTO_UDP: u8 = 0x11;

/// The length of an IPv4 header that carries no options.
pub const IPV4_MIN_HEADER_LEN: usize = 20;

/// A decoded IPv4 (Internet Protocol version 4) packet.
///
/// ## Packet Layout
/// ```txt
///    .    Octet 0    .    Octet 1    .    Octet 2    .    Octet 3    .
///    |0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  0 |Version|   IHL |    DSCP   |ECN|          Total Length         |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  4 |         Identification        |Flags|     Fragment Offset     |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  8 |  Time to Live |    Protocol   |         Header Checksum       |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// 12 |                         Source Address                        |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// 16 |                      Destination Address                      |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// 20 Z                            Options                            Z
///    Z                                                               Z
/// .. .                              ...                              .
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ?? Z                            Payload                            Z
///    Z                                                               Z
/// .. .                              ...                              .
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Decoding takes the header fields at face value: neither the checksum nor the Total Length
/// field is compared against the bytes actually present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ipv4Ref<'a> {
    header: &'a [u8; IPV4_MIN_HEADER_LEN],
    options: &'a [u8],
    payload: Payload<'a>,
}

impl<'a> Ipv4Ref<'a> {
    #[inline]
    pub fn version(&self) -> u8 {
        self.header[0] >> 4
    }

    /// The Internet Header Length, in 32-bit words.
    #[inline]
    pub fn ihl(&self) -> u8 {
        self.header[0] & 0x0F
    }

    /// The 5-bit Differentiated Services Code Point taken from the top of the second byte.
    #[inline]
    pub fn dscp(&self) -> u8 {
        (self.header[1] >> 3) & 0x1F
    }

    /// The 2-bit Explicit Congestion Notification field.
    #[inline]
    pub fn ecn(&self) -> u8 {
        self.header[1] & 0x03
    }

    #[inline]
    pub fn total_length(&self) -> u16 {
        utils::be_u16(self.header, 2)
    }

    #[inline]
    pub fn identifier(&self) -> u16 {
        utils::be_u16(self.header, 4)
    }

    /// The 3-bit flags field.
    #[inline]
    pub fn flags(&self) -> Ipv4Flags {
        Ipv4Flags::from_bits_truncate(self.header[6] >> 5)
    }

    #[inline]
    pub fn frag_offset(&self) -> u16 {
        utils::be_u16(self.header, 6) & 0x1FFF
    }

    #[inline]
    pub fn ttl(&self) -> u8 {
        self.header[8]
    }

    /// The IANA-assigned number of the protocol carried in the payload.
    #[inline]
    pub fn protocol(&self) -> u8 {
        self.header[9]
    }

    #[inline]
    pub fn chksum(&self) -> u16 {
        utils::be_u16(self.header, 10)
    }

    #[inline]
    pub fn saddr_bytes(&self) -> [u8; 4] {
        [self.header[12], self.header[13], self.header[14], self.header[15]]
    }

    #[inline]
    pub fn saddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.saddr_bytes())
    }

    #[inline]
    pub fn daddr_bytes(&self) -> [u8; 4] {
        [self.header[16], self.header[17], self.header[18], self.header[19]]
    }

    #[inline]
    pub fn daddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.daddr_bytes())
    }

    /// The raw option bytes following the fixed header. Options are not parsed.
    #[inline]
    pub fn options(&self) -> &'a [u8] {
        self.options
    }

    /// The decoded transport layer carried by the packet.
    #[inline]
    pub fn payload(&self) -> &Payload<'a> {
        &self.payload
    }
}

impl LayerName for Ipv4Ref<'_> {
    #[inline]
    fn name() -> &'static str {
        "IPv4"
    }
}

impl<'a> FromBytesRef<'a> for Ipv4Ref<'a> {
    /// Decodes the IPv4 header and the transport layer that follows it.
    ///
    /// Only a failure in the IPv4 header itself is returned as an error. A transport layer that
    /// cannot be decoded leaves the packet with a [`Payload::Invalid`] payload.
    fn from_bytes(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let (header, rest) = utils::split_array::<IPV4_MIN_HEADER_LEN>(bytes).ok_or(
            DecodeError::truncated(
                Self::name(),
                "insufficient bytes in IPv4 header (20 bytes required)",
            ),
        )?;

        let header_len = (header[0] & 0x0F) as usize * 4;
        if header_len < IPV4_MIN_HEADER_LEN {
            return Err(DecodeError::invalid_header_length(
                Self::name(),
                "invalid IPv4 header length value (IHL must be a value of 5 or more)",
            ));
        }

        let (options, payload_bytes) = utils::split_at(rest, header_len - IPV4_MIN_HEADER_LEN)
            .ok_or(DecodeError::truncated(
                Self::name(),
                "insufficient bytes for IPv4 options advertised by IHL",
            ))?;

        let payload = match Payload::from_bytes(header[9], payload_bytes) {
            Ok(payload) => payload,
            Err(e) => {
                log_debug!("IPv4 payload could not be decoded: {}", e);
                Payload::Invalid(e)
            }
        };

        Ok(Ipv4Ref {
            header,
            options,
            payload,
        })
    }
}

impl PacketLength for Ipv4Ref<'_> {
    #[inline]
    fn header_length(&self) -> usize {
        self.ihl() as usize * 4
    }

    /// The payload length declared by the Total Length field.
    ///
    /// This is negative when Total Length is smaller than the header, and may disagree with the
    /// number of bytes actually captured.
    #[inline]
    fn data_length(&self) -> isize {
        self.total_length() as isize - self.header_length() as isize
    }
}

impl fmt::Display for Ipv4Ref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IP from {} to {}, id={}, pload_t={}",
            self.saddr(),
            self.daddr(),
            self.identifier(),
            self.payload
        )
    }
}

// =============================================================================
//                                  Payload
// =============================================================================

/// The transport layer carried by an IPv4 packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payload<'a> {
    Tcp(TcpRef<'a>),
    Udp(UdpRef<'a>),
    Icmp(IcmpRef<'a>),
    /// The protocol is not one that this library decodes.
    None,
    /// The protocol is supported, but its header could not be decoded.
    Invalid(DecodeError),
}

impl<'a> Payload<'a> {
    /// Selects the decoder for `protocol` and runs it over `bytes`.
    ///
    /// Protocols other than TCP, UDP and ICMP produce [`Payload::None`] rather than an error.
    pub fn from_bytes(protocol: u8, bytes: &'a [u8]) -> Result<Self, DecodeError> {
        match protocol {
            DATA_PROTO_TCP => Ok(Payload::Tcp(TcpRef::from_bytes(bytes)?)),
            DATA_PROTO_UDP => Ok(Payload::Udp(UdpRef::from_bytes(bytes)?)),
            DATA_PROTO_ICMP => Ok(Payload::Icmp(IcmpRef::from_bytes(bytes)?)),
            other => {
                log_trace!("no decoder for IPv4 protocol {}; payload left undecoded", other);
                Ok(Payload::None)
            }
        }
    }

    /// Indicates whether no transport layer was decoded.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None | Payload::Invalid(_))
    }

    #[inline]
    pub fn tcp(&self) -> Option<&TcpRef<'a>> {
        match self {
            Payload::Tcp(tcp) => Some(tcp),
            _ => None,
        }
    }

    #[inline]
    pub fn udp(&self) -> Option<&UdpRef<'a>> {
        match self {
            Payload::Udp(udp) => Some(udp),
            _ => None,
        }
    }

    #[inline]
    pub fn icmp(&self) -> Option<&IcmpRef<'a>> {
        match self {
            Payload::Icmp(icmp) => Some(icmp),
            _ => None,
        }
    }

    /// The (source, destination) ports of a TCP or UDP payload.
    #[inline]
    pub fn transport_ports(&self) -> Option<(u16, u16)> {
        match self {
            Payload::Tcp(tcp) => Some((tcp.sport(), tcp.dport())),
            Payload::Udp(udp) => Some((udp.sport(), udp.dport())),
            Payload::Icmp(_) | Payload::None | Payload::Invalid(_) => None,
        }
    }

    /// The header and data lengths of the decoded transport layer, if there is one.
    #[inline]
    pub fn lengths(&self) -> Option<(usize, isize)> {
        match self {
            Payload::Tcp(tcp) => Some((tcp.header_length(), tcp.data_length())),
            Payload::Udp(udp) => Some((udp.header_length(), udp.data_length())),
            Payload::Icmp(icmp) => Some((icmp.header_length(), icmp.data_length())),
            Payload::None | Payload::Invalid(_) => None,
        }
    }
}

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Tcp(tcp) => fmt::Display::fmt(tcp, f),
            Payload::Udp(udp) => fmt::Display::fmt(udp, f),
            Payload::Icmp(icmp) => fmt::Display::fmt(icmp, f),
            Payload::None | Payload::Invalid(_) => f.write_str("None"),
        }
    }
}

// =============================================================================
//                              INTERNAL FIELDS
// =============================================================================

bitflags! {
    /// The 3-bit flags field of an IPv4 header.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Ipv4Flags: u8 {
        const RESERVED = 0b100;
        const DONT_FRAGMENT = 0b010;
        const MORE_FRAGMENTS = 0b001;
    }
}

impl Ipv4Flags {
    #[inline]
    pub fn reserved(&self) -> bool {
        self.contains(Ipv4Flags::RESERVED)
    }

    #[inline]
    pub fn dont_fragment(&self) -> bool {
        self.contains(Ipv4Flags::DONT_FRAGMENT)
    }

    #[inline]
    pub fn more_fragments(&self) -> bool {
        self.contains(Ipv4Flags::MORE_FRAGMENTS)
    }
}
