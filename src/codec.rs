//! Little-endian scalar packing for message payloads.
//!
//! Every `put_*` returns the new write offset, so calls chain naturally:
//! `offset = put_u16(buf, put_u8(buf, 0, a), b)`. On truncation the offset is
//! returned **unchanged**; callers detect failure by comparing the offset
//! delta against the scalar size. `get_*` mirrors this for reads, returning
//! the value together with the new read offset (value is zero when
//! truncated).

/// Store one byte, returning `offset + 1` (or `offset` if out of bounds).
pub fn put_u8(dst: &mut [u8], offset: usize, value: u8) -> usize {
    match dst.get_mut(offset) {
        Some(slot) => {
            *slot = value;
            offset + 1
        }
        None => offset,
    }
}

/// Store a 2-byte halfword little-endian, returning the new write offset.
pub fn put_u16(dst: &mut [u8], offset: usize, value: u16) -> usize {
    match dst.get_mut(offset..offset + 2) {
        Some(slot) => {
            slot.copy_from_slice(&value.to_le_bytes());
            offset + 2
        }
        None => offset,
    }
}

/// Store a 4-byte word little-endian, returning the new write offset.
pub fn put_u32(dst: &mut [u8], offset: usize, value: u32) -> usize {
    match dst.get_mut(offset..offset + 4) {
        Some(slot) => {
            slot.copy_from_slice(&value.to_le_bytes());
            offset + 4
        }
        None => offset,
    }
}

/// Read one byte, returning `(value, offset + 1)` (or `(0, offset)` if
/// truncated).
pub fn get_u8(src: &[u8], offset: usize) -> (u8, usize) {
    match src.get(offset) {
        Some(&value) => (value, offset + 1),
        None => (0, offset),
    }
}

/// Read a little-endian 2-byte halfword, returning the value and the new
/// read offset.
pub fn get_u16(src: &[u8], offset: usize) -> (u16, usize) {
    match src.get(offset..offset + 2) {
        Some(bytes) => {
            let mut raw = [0u8; 2];
            raw.copy_from_slice(bytes);
            (u16::from_le_bytes(raw), offset + 2)
        }
        None => (0, offset),
    }
}

/// Read a little-endian 4-byte word, returning the value and the new read
/// offset.
pub fn get_u32(src: &[u8], offset: usize) -> (u32, usize) {
    match src.get(offset..offset + 4) {
        Some(bytes) => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(bytes);
            (u32::from_le_bytes(raw), offset + 4)
        }
        None => (0, offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_writes_round_trip() {
        let mut buf = [0u8; 8];
        let offset = put_u8(&mut buf, 0, 0xAB);
        let offset = put_u16(&mut buf, offset, 0x1234);
        let offset = put_u32(&mut buf, offset, 0xDEAD_BEEF);
        assert_eq!(offset, 7);

        let (byte, offset) = get_u8(&buf, 0);
        let (half, offset) = get_u16(&buf, offset);
        let (word, offset) = get_u32(&buf, offset);
        assert_eq!((byte, half, word, offset), (0xAB, 0x1234, 0xDEAD_BEEF, 7));
    }

    #[test]
    fn values_are_little_endian() {
        let mut buf = [0u8; 4];
        assert_eq!(put_u32(&mut buf, 0, 0x0102_0304), 4);
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn truncated_write_leaves_offset_unchanged() {
        let mut buf = [0u8; 3];
        assert_eq!(put_u32(&mut buf, 0, 1), 0);
        assert_eq!(put_u16(&mut buf, 2, 1), 2);
        assert_eq!(put_u8(&mut buf, 3, 1), 3);
        assert_eq!(buf, [0, 0, 0]);
    }

    #[test]
    fn truncated_read_yields_zero_and_same_offset() {
        let buf = [0xFFu8; 2];
        assert_eq!(get_u32(&buf, 0), (0, 0));
        assert_eq!(get_u16(&buf, 1), (0, 1));
        assert_eq!(get_u8(&buf, 2), (0, 2));
    }
}
