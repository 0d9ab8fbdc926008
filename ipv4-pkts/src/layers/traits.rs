// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Traits implemented by every decoded layer.

use crate::error::DecodeError;

/// A trait for retrieving the name of a protocol layer.
pub trait LayerName {
    /// The name of the layer, as used in error messages.
    fn name() -> &'static str;
}

/// A trait for retrieving the header and payload lengths (in bytes) of a decoded layer.
pub trait PacketLength {
    /// The number of bytes consumed by the layer's own header, including any options.
    fn header_length(&self) -> usize;

    /// The number of bytes of payload carried after the layer's header.
    ///
    /// How this is derived differs between layers: IPv4 trusts its Total Length field, while
    /// transport layers count the bytes actually handed to them. The value is signed because a
    /// malformed IPv4 Total Length may be smaller than the header it belongs to.
    fn data_length(&self) -> isize;
}

/// A trait for decoding a layer as a view into an existing byte slice.
pub trait FromBytesRef<'a>: Sized + LayerName {
    /// Decodes the layer from the start of `bytes`.
    ///
    /// Fails if `bytes` does not hold the full header of the layer. Bytes past the end of the
    /// header are treated as the layer's payload.
    fn from_bytes(bytes: &'a [u8]) -> Result<Self, DecodeError>;

    /// Checks that `bytes` can be decoded as this layer without keeping the decoded view.
    #[inline]
    fn validate(bytes: &'a [u8]) -> Result<(), DecodeError> {
        Self::from_bytes(bytes).map(|_| ())
    }
}
