// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A library for decoding IPv4 datagrams and the TCP, UDP or ICMP layer they carry.
//!
//! Decoding is read-only: every layer is a view borrowed from the caller's buffer, built once
//! and never modified. The entry point is [`Ipv4Ref::from_bytes`], which decodes the IPv4
//! header and dispatches the remaining bytes to the matching transport decoder. A
//! [`FlowKey`] can then be derived from any datagram carrying TCP.
//!
//! ```
//! use ipv4_pkts::prelude::*;
//!
//! let bytes = [
//!     0x45, 0x00, 0x00, 0x1c, 0x12, 0x34, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00,
//!     192, 168, 1, 10, 192, 168, 1, 1,
//!     0x30, 0x39, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00,
//! ];
//!
//! let ip = Ipv4Ref::from_bytes(&bytes).unwrap();
//! assert_eq!(
//!     ip.to_string(),
//!     "IP from 192.168.1.10 to 192.168.1.1, id=4660, pload_t=UDP from 12345 to 53"
//! );
//! ```
//!
//! [`Ipv4Ref::from_bytes`]: crate::layers::traits::FromBytesRef::from_bytes
//! [`FlowKey`]: crate::flow::FlowKey

#![forbid(unsafe_code)]

#[cfg(feature = "log")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }};
}

pub mod error;
pub mod flow;
pub mod layers;
pub mod prelude;
pub mod utils;
