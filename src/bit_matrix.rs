//! Bit-addressable 2D canvas backing the illumination mask.
//!
//! Every public accessor bounds-checks its row/column/linear index and turns
//! a violation into a no-op (or `false`); nothing here panics. Cells are
//! addressed row-major: linear index = `row * width + col`.

use heapless::Vec;

/// Maximum number of cells a [`BitMatrix`] can hold.
pub const MAX_MATRIX_CELLS: usize = MAX_MATRIX_BYTES * 8;

const MAX_MATRIX_BYTES: usize = 64;
const BITS_PER_BYTE: u32 = 8;

/// Fixed-shape bit matrix. Allocated once per rendering surface, mutated
/// every render cycle, never resized.
#[derive(Clone, Debug)]
pub struct BitMatrix {
    width: u16,
    height: u16,
    bit_count: u32,
    bits: Vec<u8, MAX_MATRIX_BYTES>,
}

impl BitMatrix {
    /// New all-clear matrix of the given shape.
    ///
    /// A shape exceeding [`MAX_MATRIX_CELLS`] yields an empty 0x0 matrix on
    /// which every operation is a no-op.
    pub fn new(width: u16, height: u16) -> Self {
        let bit_count = u32::from(width) * u32::from(height);
        let byte_count = bit_count.div_ceil(BITS_PER_BYTE) as usize;
        let mut bits = Vec::new();
        if bits.resize(byte_count, 0).is_err() {
            error!("BitMatrix: {}x{} exceeds capacity", width, height);
            return Self {
                width: 0,
                height: 0,
                bit_count: 0,
                bits: Vec::new(),
            };
        }
        Self {
            width,
            height,
            bit_count,
            bits,
        }
    }

    /// Number of cells.
    pub const fn size(&self) -> u32 {
        self.bit_count
    }

    /// Matrix width in columns.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Matrix height in rows.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Set every bit.
    pub fn set_all(&mut self) {
        for byte in &mut self.bits {
            *byte = 0xFF;
        }
    }

    /// Clear every bit.
    pub fn clear_all(&mut self) {
        for byte in &mut self.bits {
            *byte = 0;
        }
    }

    /// Whether the bit at a linear index is set; out of range reads `false`.
    pub fn is_bit(&self, index: u32) -> bool {
        if index >= self.bit_count {
            return false;
        }
        let byte = self.bits[(index / BITS_PER_BYTE) as usize];
        byte & (1 << (index % BITS_PER_BYTE)) != 0
    }

    /// Whether the bit at `(row, col)` is set; out of range reads `false`.
    pub fn is_bit_at(&self, row: u16, col: u16) -> bool {
        if row >= self.height || col >= self.width {
            return false;
        }
        self.is_bit(self.linear_index(row, col))
    }

    /// Set the bit at a linear index; out of range is a no-op.
    pub fn set_bit(&mut self, index: u32) {
        if index < self.bit_count {
            self.bits[(index / BITS_PER_BYTE) as usize] |= 1 << (index % BITS_PER_BYTE);
        }
    }

    /// Clear the bit at a linear index; out of range is a no-op.
    pub fn clear_bit(&mut self, index: u32) {
        if index < self.bit_count {
            self.bits[(index / BITS_PER_BYTE) as usize] &= !(1 << (index % BITS_PER_BYTE));
        }
    }

    /// Set the bit at `(row, col)`; out of range is a no-op.
    pub fn set_bit_at(&mut self, row: u16, col: u16) {
        if row < self.height && col < self.width {
            self.set_bit(self.linear_index(row, col));
        }
    }

    /// Clear the bit at `(row, col)`; out of range is a no-op.
    pub fn clear_bit_at(&mut self, row: u16, col: u16) {
        if row < self.height && col < self.width {
            self.clear_bit(self.linear_index(row, col));
        }
    }

    /// Set a horizontal run of `length` bits starting at `(row, col)`.
    /// A run that would cross the right edge is a no-op.
    pub fn set_line(&mut self, row: u16, col: u16, length: u16) {
        if length > 0
            && row < self.height
            && col < self.width
            && u32::from(col) + u32::from(length) <= u32::from(self.width)
        {
            for offset in 0..length {
                self.set_bit_at(row, col + offset);
            }
        }
    }

    /// Set a rectangular area of bits; an area crossing any edge is a no-op.
    pub fn set_area(&mut self, row: u16, col: u16, area_width: u16, area_height: u16) {
        if row < self.height
            && u32::from(row) + u32::from(area_height) <= u32::from(self.height)
            && col < self.width
            && u32::from(col) + u32::from(area_width) <= u32::from(self.width)
        {
            for offset in 0..area_height {
                self.set_line(row + offset, col, area_width);
            }
        }
    }

    /// Reverse the bit order of one row by symmetric swap.
    pub fn flip_row(&mut self, row: u16) {
        if row >= self.height {
            return;
        }
        for col in 0..self.width / 2 {
            let left = self.linear_index(row, col);
            let right = self.linear_index(row, self.width - 1 - col);
            self.swap_bits(left, right);
        }
    }

    /// Reverse the bit order of one column by symmetric swap.
    pub fn flip_column(&mut self, col: u16) {
        if col >= self.width {
            return;
        }
        for row in 0..self.height / 2 {
            let top = self.linear_index(row, col);
            let bottom = self.linear_index(self.height - 1 - row, col);
            self.swap_bits(top, bottom);
        }
    }

    /// Mirror the matrix left-to-right.
    pub fn flip_horizontal(&mut self) {
        for row in 0..self.height {
            self.flip_row(row);
        }
    }

    /// Mirror the matrix top-to-bottom.
    pub fn flip_vertical(&mut self) {
        for col in 0..self.width {
            self.flip_column(col);
        }
    }

    /// Copy another matrix's bits into this one; differing shapes are a
    /// no-op.
    pub fn copy_from(&mut self, other: &Self) {
        if self.same_shape(other) {
            self.bits.copy_from_slice(&other.bits);
        }
    }

    /// Element-wise OR with another matrix; differing shapes are a no-op.
    pub fn union_with(&mut self, other: &Self) {
        if self.same_shape(other) {
            for (byte, &other_byte) in self.bits.iter_mut().zip(other.bits.iter()) {
                *byte |= other_byte;
            }
        }
    }

    /// Element-wise AND with another matrix; differing shapes are a no-op.
    pub fn intersect_with(&mut self, other: &Self) {
        if self.same_shape(other) {
            for (byte, &other_byte) in self.bits.iter_mut().zip(other.bits.iter()) {
                *byte &= other_byte;
            }
        }
    }

    /// Clear every bit that is set in `other`; differing shapes are a no-op.
    pub fn difference_with(&mut self, other: &Self) {
        if self.same_shape(other) {
            for (byte, &other_byte) in self.bits.iter_mut().zip(other.bits.iter()) {
                *byte &= !other_byte;
            }
        }
    }

    const fn linear_index(&self, row: u16, col: u16) -> u32 {
        row as u32 * self.width as u32 + col as u32
    }

    fn swap_bits(&mut self, first: u32, second: u32) {
        let first_set = self.is_bit(first);
        let second_set = self.is_bit(second);
        if first_set != second_set {
            if first_set {
                self.set_bit(second);
                self.clear_bit(first);
            } else {
                self.set_bit(first);
                self.clear_bit(second);
            }
        }
    }

    const fn same_shape(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl PartialEq for BitMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other) && self.bits == other.bits
    }
}

impl Eq for BitMatrix {}
