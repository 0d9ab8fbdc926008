// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Transmission Control Protocol (TCP) and related data structures.

use core::fmt;

use bitflags::bitflags;

use crate::error::DecodeError;
use crate::layers::traits::*;
use crate::utils;

/// The length of a TCP header that carries no options.
pub const TCP_MIN_HEADER_LEN: usize = 20;

/// A decoded TCP (Transmission Control Protocol) packet.
///
/// ## Packet Layout
/// ```txt
///    .    Octet 0    .    Octet 1    .    Octet 2    .    Octet 3    .
///    |0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|0 1 2 3 4 5 6 7|
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  0 |          Source Port          |        Destination Port       |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  4 |                        Sequence Number                        |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  8 |                     Acknowledgement Number                    |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// 12 | Offset| Res |N|C|E|U|A|P|R|S|F|          Window Size          |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// 16 |            Checksum           |         Urgent Pointer        |
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
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TcpRef<'a> {
    header: &'a [u8; TCP_MIN_HEADER_LEN],
    options: &'a [u8],
    payload: &'a [u8],
}

impl<'a> TcpRef<'a> {
    /// The source port of the TCP packet.
    #[inline]
    pub fn sport(&self) -> u16 {
        utils::be_u16(self.header, 0)
    }

    /// The destination port of the TCP packet.
    #[inline]
    pub fn dport(&self) -> u16 {
        utils::be_u16(self.header, 2)
    }

    /// The sequence number of the TCP packet.
    #[inline]
    pub fn seq(&self) -> u32 {
        utils::be_u32(self.header, 4)
    }

    /// The acknowledgement number of the TCP packet.
    #[inline]
    pub fn ack(&self) -> u32 {
        utils::be_u32(self.header, 8)
    }

    /// The number of 32-bit words in the TCP header (options included).
    ///
    /// Note that this offset is a multiple of 4 bytes, meaning that a data offset value of 5 would
    /// correspond to a 20-byte header.
    #[inline]
    pub fn data_offset(&self) -> u8 {
        self.header[12] >> 4
    }

    /// The flags of the TCP packet.
    #[inline]
    pub fn flags(&self) -> TcpFlags {
        TcpFlags::from(utils::be_u16(self.header, 12))
    }

    #[inline]
    pub fn ns(&self) -> bool {
        self.flags().contains(TcpFlags::NS)
    }

    #[inline]
    pub fn cwr(&self) -> bool {
        self.flags().contains(TcpFlags::CWR)
    }

    #[inline]
    pub fn ece(&self) -> bool {
        self.flags().contains(TcpFlags::ECE)
    }

    #[inline]
    pub fn urg(&self) -> bool {
        self.flags().contains(TcpFlags::URG)
    }

    #[inline]
    pub fn ack_flag(&self) -> bool {
        self.flags().contains(TcpFlags::ACK)
    }

    #[inline]
    pub fn psh(&self) -> bool {
        self.flags().contains(TcpFlags::PSH)
    }

    #[inline]
    pub fn rst(&self) -> bool {
        self.flags().contains(TcpFlags::RST)
    }

    #[inline]
    pub fn syn(&self) -> bool {
        self.flags().contains(TcpFlags::SYN)
    }

    #[inline]
    pub fn fin(&self) -> bool {
        self.flags().contains(TcpFlags::FIN)
    }

    /// The receive window advertised by the TCP packet.
    #[inline]
    pub fn window(&self) -> u16 {
        utils::be_u16(self.header, 14)
    }

    /// The checksum of the packet. This value is not verified.
    #[inline]
    pub fn chksum(&self) -> u16 {
        utils::be_u16(self.header, 16)
    }

    /// A pointer to the offset of data considered to be urgent within the packet.
    #[inline]
    pub fn urgent_ptr(&self) -> u16 {
        utils::be_u16(self.header, 18)
    }

    /// The raw option bytes of the TCP packet. Options are not parsed.
    #[inline]
    pub fn options(&self) -> &'a [u8] {
        self.options
    }

    /// The bytes following the TCP header.
    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

impl LayerName for TcpRef<'_> {
    #[inline]
    fn name() -> &'static str {
        "TCP"
    }
}

impl<'a> FromBytesRef<'a> for TcpRef<'a> {
    fn from_bytes(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let (header, rest) = utils::split_array::<TCP_MIN_HEADER_LEN>(bytes).ok_or(
            DecodeError::truncated(
                Self::name(),
                "insufficient bytes in TCP header (20 bytes required)",
            ),
        )?;

        let header_len = (header[12] >> 4) as usize * 4;
        if header_len < TCP_MIN_HEADER_LEN {
            return Err(DecodeError::invalid_header_length(
                Self::name(),
                "invalid TCP header length value (Data Offset must be a value of 5 or more)",
            ));
        }

        let (options, payload) = utils::split_at(rest, header_len - TCP_MIN_HEADER_LEN).ok_or(
            DecodeError::truncated(
                Self::name(),
                "insufficient bytes for TCP options advertised by Data Offset",
            ),
        )?;

        Ok(TcpRef {
            header,
            options,
            payload,
        })
    }
}

impl PacketLength for TcpRef<'_> {
    #[inline]
    fn header_length(&self) -> usize {
        self.data_offset() as usize * 4
    }

    #[inline]
    fn data_length(&self) -> isize {
        self.payload.len() as isize
    }
}

impl fmt::Display for TcpRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TCP from {} to {}", self.sport(), self.dport())
    }
}

// =============================================================================
//                         Inner Field Data Structures
// =============================================================================

bitflags! {
    /// The control bits held in the low 9 bits of the TCP Data Offset/Flags word.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TcpFlags: u16 {
        const NS = 0b_0000_0001_0000_0000;
        const CWR = 0b_0000_0000_1000_0000;
        const ECE = 0b_0000_0000_0100_0000;
        const URG = 0b_0000_0000_0010_0000;
        const ACK = 0b_0000_0000_0001_0000;
        const PSH = 0b_0000_0000_0000_1000;
        const RST = 0b_0000_0000_0000_0100;
        const SYN = 0b_0000_0000_0000_0010;
        const FIN = 0b_0000_0000_0000_0001;
    }
}

impl From<u16> for TcpFlags {
    /// Extracts the flag bits from the combined Data Offset/Flags word, discarding the offset and
    /// reserved bits.
    #[inline]
    fn from(value: u16) -> Self {
        TcpFlags::from_bits_truncate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorClass;

    fn tcp_header(offset_flags: u16) -> Vec<u8> {
        let mut bytes = vec![
            0xd4, 0x31, // sport 54321
            0x00, 0x50, // dport 80
            0x00, 0x00, 0x00, 0x01, // seq
            0x00, 0x00, 0x00, 0x02, // ack
        ];
        bytes.extend(offset_flags.to_be_bytes());
        bytes.extend([0xff, 0xff, 0xab, 0xcd, 0x00, 0x07]);
        bytes
    }

    #[test]
    fn decodes_fixed_fields() {
        let bytes = tcp_header(0x5018);
        let tcp = TcpRef::from_bytes(&bytes).unwrap();

        assert_eq!(tcp.sport(), 54321);
        assert_eq!(tcp.dport(), 80);
        assert_eq!(tcp.seq(), 1);
        assert_eq!(tcp.ack(), 2);
        assert_eq!(tcp.data_offset(), 5);
        assert_eq!(tcp.window(), 0xffff);
        assert_eq!(tcp.chksum(), 0xabcd);
        assert_eq!(tcp.urgent_ptr(), 7);
        assert!(tcp.options().is_empty());
        assert_eq!(tcp.header_length(), 20);
        assert_eq!(tcp.data_length(), 0);
    }

    #[test]
    fn flags_follow_bitmasks() {
        let bytes = tcp_header(0x5018);
        let tcp = TcpRef::from_bytes(&bytes).unwrap();

        assert_eq!(tcp.flags(), TcpFlags::ACK | TcpFlags::PSH);
        assert!(tcp.ack_flag());
        assert!(tcp.psh());
        assert!(!tcp.ns());
        assert!(!tcp.cwr());
        assert!(!tcp.ece());
        assert!(!tcp.urg());
        assert!(!tcp.rst());
        assert!(!tcp.syn());
        assert!(!tcp.fin());
    }

    #[test]
    fn each_flag_matches_its_mask() {
        let named: [(u16, fn(&TcpRef<'_>) -> bool); 9] = [
            (0x0100, |t| t.ns()),
            (0x0080, |t| t.cwr()),
            (0x0040, |t| t.ece()),
            (0x0020, |t| t.urg()),
            (0x0010, |t| t.ack_flag()),
            (0x0008, |t| t.psh()),
            (0x0004, |t| t.rst()),
            (0x0002, |t| t.syn()),
            (0x0001, |t| t.fin()),
        ];

        for (mask, _) in named {
            let bytes = tcp_header(0x5000 | mask);
            let tcp = TcpRef::from_bytes(&bytes).unwrap();
            for (other_mask, getter) in named {
                assert_eq!(getter(&tcp), mask == other_mask, "mask {:#06x}", other_mask);
            }
        }
    }

    #[test]
    fn reserved_bits_are_not_flags() {
        let bytes = tcp_header(0x5e00);
        let tcp = TcpRef::from_bytes(&bytes).unwrap();
        assert_eq!(tcp.flags(), TcpFlags::empty());
    }

    #[test]
    fn options_and_data_length() {
        let mut bytes = tcp_header(0x8002);
        bytes.extend([0x02, 0x04, 0x05, 0xb4, 0x01, 0x01, 0x04, 0x02, 0x01, 0x03, 0x03, 0x07]);
        bytes.extend(b"payload");
        let tcp = TcpRef::from_bytes(&bytes).unwrap();

        assert_eq!(tcp.data_offset(), 8);
        assert_eq!(tcp.header_length(), 32);
        assert_eq!(tcp.options().len(), 12);
        assert_eq!(tcp.payload(), b"payload");
        assert!(tcp.syn());
    }

    #[test]
    fn data_length_is_slice_length_minus_header() {
        for offset in 5u16..=15 {
            let header_len = offset as usize * 4;
            for extra in [0usize, 1, 100] {
                let mut bytes = tcp_header(offset << 12);
                bytes.resize(header_len + extra, 0);
                let tcp = TcpRef::from_bytes(&bytes).unwrap();
                assert_eq!(tcp.data_length(), (bytes.len() - header_len) as isize);
            }
        }
    }

    #[test]
    fn short_header_is_truncated() {
        let bytes = tcp_header(0x5000);
        let err = TcpRef::from_bytes(&bytes[..19]).unwrap_err();
        assert_eq!(err.class, DecodeErrorClass::TruncatedHeader);
        assert_eq!(err.layer, "TCP");
    }

    #[test]
    fn missing_options_are_truncated() {
        let bytes = tcp_header(0x6000);
        let err = TcpRef::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.class, DecodeErrorClass::TruncatedHeader);
    }

    #[test]
    fn undersized_data_offset_rejected() {
        let bytes = tcp_header(0x4000);
        let err = TcpRef::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.class, DecodeErrorClass::InvalidHeaderLength);
    }

    #[test]
    fn summary() {
        let bytes = tcp_header(0x5002);
        let tcp = TcpRef::from_bytes(&bytes).unwrap();
        assert_eq!(tcp.to_string(), "TCP from 54321 to 80");
    }
}
