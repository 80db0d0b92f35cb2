// BodyPress - Outbound Payload Compression
// Copyright (C) 2025 BodyPress Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Output buffer sizing for single-shot deflate
//!
//! Capacity is `floor(len * 1.1) + 22`, zlib's documented worst case for
//! incompressible input. It is computed as `len * 11 / 10` in 64-bit
//! integers so no float rounding or 32-bit truncation can shrink it.

use crate::error::UnifiedErrorCode;

/// Fixed overhead added on top of the proportional bound
pub const SIZING_OVERHEAD: u64 = 22;

/// Worst-case compressed size for `input_len` bytes.
///
/// Returns `None` when the bound does not fit in `usize`.
pub fn output_capacity(input_len: usize) -> Option<usize> {
    let len = u64::try_from(input_len).ok()?;
    let bound = len.checked_mul(11)? / 10;
    let bound = bound.checked_add(SIZING_OVERHEAD)?;
    usize::try_from(bound).ok()
}

/// Resize `dest` to the worst-case capacity for `input_len`.
///
/// Any previous contents are discarded. Fails with `Buffer` if the bound
/// overflows or the resized length disagrees with the requested capacity,
/// and with `Memory` if the allocation is refused.
pub(crate) fn prepare_output_buffer(
    dest: &mut Vec<u8>,
    input_len: usize,
) -> Result<usize, UnifiedErrorCode> {
    let capacity = output_capacity(input_len).ok_or(UnifiedErrorCode::Buffer)?;

    dest.clear();
    dest.try_reserve_exact(capacity)
        .map_err(|_| UnifiedErrorCode::Memory)?;
    dest.resize(capacity, 0);

    if dest.len() != capacity {
        return Err(UnifiedErrorCode::Buffer);
    }

    Ok(capacity)
}
