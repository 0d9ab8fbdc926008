// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Flow keys for TCP connections.
//!
//! A flow key identifies the connection a TCP segment belongs to as a (remote address, remote
//! port, local address, local port) tuple. By default the packet's source is taken to be the
//! remote end of the connection; flipping swaps which end is considered remote.

use core::fmt;
use std::net::Ipv4Addr;

use crate::layers::ip::{Ipv4Ref, Payload};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub remote_addr: Ipv4Addr,
    pub remote_port: u16,
    pub local_addr: Ipv4Addr,
    pub local_port: u16,
}

impl FlowKey {
    /// The same flow with its remote and local endpoints swapped.
    #[inline]
    pub fn flipped(self) -> Self {
        FlowKey {
            remote_addr: self.local_addr,
            remote_port: self.local_port,
            local_addr: self.remote_addr,
            local_port: self.remote_port,
        }
    }

    #[inline]
    pub fn as_tuple(&self) -> (Ipv4Addr, u16, Ipv4Addr, u16) {
        (
            self.remote_addr,
            self.remote_port,
            self.local_addr,
            self.local_port,
        )
    }
}

impl From<FlowKey> for (Ipv4Addr, u16, Ipv4Addr, u16) {
    #[inline]
    fn from(key: FlowKey) -> Self {
        key.as_tuple()
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.remote_addr, self.remote_port, self.local_addr, self.local_port
        )
    }
}

/// Derives the flow key of an IPv4 packet carrying TCP.
///
/// With `flip` unset the key is (source, source port, destination, destination port); with
/// `flip` set the endpoints are reversed. Packets whose payload is not TCP have no flow key.
pub fn flow_key(ip: &Ipv4Ref<'_>, flip: bool) -> Option<FlowKey> {
    let tcp = match ip.payload() {
        Payload::Tcp(tcp) => tcp,
        Payload::Udp(_) | Payload::Icmp(_) | Payload::None | Payload::Invalid(_) => {
            log_trace!("no flow key for IPv4 protocol {}", ip.protocol());
            return None;
        }
    };

    let key = FlowKey {
        remote_addr: ip.saddr(),
        remote_port: tcp.sport(),
        local_addr: ip.daddr(),
        local_port: tcp.dport(),
    };

    if flip {
        Some(key.flipped())
    } else {
        Some(key)
    }
}
