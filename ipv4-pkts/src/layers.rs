// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The protocol layers decoded by this library.
//!
//! Each layer is split into a header and a payload, where the header contains data specific to
//! the operation of that layer and the payload holds the next layer of data. Decoding starts at
//! [`Ipv4Ref`], whose payload is selected by the IPv4 Protocol field and decoded as one of
//! [`TcpRef`], [`UdpRef`] or [`IcmpRef`]. Layers above the transport layer are never inferred.
//!
//! The [`traits`] module contains traits implemented by every layer.
//!
//! [`Ipv4Ref`]: crate::layers::ip::Ipv4Ref
//! [`TcpRef`]: crate::layers::tcp::TcpRef
//! [`UdpRef`]: crate::layers::udp::UdpRef
//! [`IcmpRef`]: crate::layers::icmp::IcmpRef

pub mod icmp;
pub mod ip;
pub mod tcp;
pub mod traits;
pub mod udp;
