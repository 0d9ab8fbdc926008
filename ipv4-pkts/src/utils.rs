// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2024 Nathaniel Bennett <me[at]nathanielbennett[dotcom]>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # General utility functions
//!
//! Slice helpers shared by the layer decoders. Each returns `None` rather than panicking
//! when the requested range falls outside of the given bytes.

#[inline]
pub fn get_array<const T: usize>(bytes: &[u8], start: usize) -> Option<&[u8; T]> {
    bytes.get(start..start.checked_add(T)?)?.try_into().ok()
}

/// Splits off a fixed-size array from the front of `bytes`, returning it along with the bytes
/// that follow it.
#[inline]
pub fn split_array<const T: usize>(bytes: &[u8]) -> Option<(&[u8; T], &[u8])> {
    Some((bytes.get(..T)?.try_into().ok()?, bytes.get(T..)?))
}

#[inline]
pub fn split_at(bytes: &[u8], idx: usize) -> Option<(&[u8], &[u8])> {
    match (bytes.get(..idx), bytes.get(idx..)) {
        (Some(b1), Some(b2)) => Some((b1, b2)),
        _ => None,
    }
}

#[inline]
pub(crate) fn be_u16<const N: usize>(arr: &[u8; N], start: usize) -> u16 {
    u16::from_be_bytes([arr[start], arr[start + 1]])
}

#[inline]
pub(crate) fn be_u32<const N: usize>(arr: &[u8; N], start: usize) -> u32 {
    u32::from_be_bytes([arr[start], arr[start + 1], arr[start + 2], arr[start + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_array_short_input() {
        assert!(split_array::<4>(&[1, 2, 3]).is_none());

        let (head, rest) = split_array::<2>(&[1, 2, 3]).unwrap();
        assert_eq!(head, &[1, 2]);
        assert_eq!(rest, &[3]);
    }

    #[test]
    fn split_at_bounds() {
        assert_eq!(split_at(&[1, 2], 2), Some((&[1u8, 2][..], &[][..])));
        assert!(split_at(&[1, 2], 3).is_none());
    }

    #[test]
    fn get_array_overflowing_start() {
        assert!(get_array::<2>(&[0; 4], usize::MAX).is_none());
        assert_eq!(get_array::<2>(&[0, 1, 2, 3], 2), Some(&[2, 3]));
    }

    #[test]
    fn big_endian_reads() {
        let arr = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(be_u16(&arr, 1), 0x3456);
        assert_eq!(be_u32(&arr, 0), 0x12345678);
    }
}
