// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors produced while decoding a layer from raw bytes.

use thiserror::Error;

/// An error indicating that a layer could not be decoded from the bytes it was given.
///
/// Errors are local to the layer being decoded: a failure in a transport layer does not
/// invalidate the IPv4 header that encapsulates it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("{layer} decode failed ({class}): {reason}")]
pub struct DecodeError {
    /// The name of the layer that failed to decode.
    pub layer: &'static str,
    /// The general category of the failure.
    pub class: DecodeErrorClass,
    /// A human-readable description of what was wrong with the bytes.
    pub reason: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeErrorClass {
    /// The slice is shorter than the header of the layer being decoded.
    #[error("truncated header")]
    TruncatedHeader,
    /// A header length field claims a length below the fixed portion of the header.
    #[error("invalid header length")]
    InvalidHeaderLength,
}

impl DecodeError {
    #[inline]
    pub(crate) const fn truncated(layer: &'static str, reason: &'static str) -> Self {
        DecodeError {
            layer,
            class: DecodeErrorClass::TruncatedHeader,
            reason,
        }
    }

    #[inline]
    pub(crate) const fn invalid_header_length(layer: &'static str, reason: &'static str) -> Self {
        DecodeError {
            layer,
            class: DecodeErrorClass::InvalidHeaderLength,
            reason,
        }
    }
}
