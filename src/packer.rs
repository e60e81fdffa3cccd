//! Wire format for the panel RAM
//!
//! One bit per pixel, rows padded to whole bytes, most significant bit is
//! the leftmost pixel. Ink packs as `0`, background as `1`; this is the
//! polarity the controller expects in its black/white RAM. Padding bits are
//! left at `1` (white).

use crate::pixel_buffer::PixelBuffer;

/// Bytes per packed row for a raster `width` pixels wide
pub fn bytes_per_row(width: u32) -> usize {
    width.div_ceil(8) as usize
}

/// Packed length of a `width x height` raster
pub fn packed_len(width: u32, height: u32) -> usize {
    bytes_per_row(width) * height as usize
}

/// Pack a raster that is already in native layout and size.
///
/// `native` is the `(width, height)` the controller was built for.
pub fn pack(image: &PixelBuffer, native: (u32, u32)) -> Vec<u8> {
    debug_assert_eq!(
        image.dimensions(),
        native,
        "frame must be normalized before packing"
    );

    let (width, height) = image.dimensions();
    let row_bytes = bytes_per_row(width);
    let mut buffer = vec![0xFF; packed_len(width, height)];

    for y in 0..height {
        let row = &mut buffer[y as usize * row_bytes..(y as usize + 1) * row_bytes];
        for x in 0..width {
            if image.get(x, y) {
                row[(x / 8) as usize] &= !(0x80 >> (x % 8));
            }
        }
    }

    buffer
}

#[cfg(test)]
pub(crate) fn unpack(buffer: &[u8], width: u32, height: u32) -> PixelBuffer {
    let row_bytes = bytes_per_row(width);
    let mut image = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let byte = buffer[y as usize * row_bytes + (x / 8) as usize];
            if byte & (0x80 >> (x % 8)) == 0 {
                image.set(x, y, true);
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_length_rounds_rows_up() {
        for &(width, height) in &[(1, 1), (7, 3), (8, 3), (9, 2), (122, 250), (128, 296)] {
            let image = PixelBuffer::new(width, height);
            let packed = pack(&image, (width, height));
            assert_eq!(packed.len(), (width as usize).div_ceil(8) * height as usize);
        }
        assert_eq!(packed_len(122, 250), 4000);
    }

    #[test]
    fn blank_frame_is_all_white() {
        let packed = pack(&PixelBuffer::new(122, 250), (122, 250));
        assert!(packed.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn ink_is_zero_and_msb_first() {
        let mut image = PixelBuffer::new(16, 1);
        image.set(0, 0, true);
        image.set(9, 0, true);
        image.set(15, 0, true);

        assert_eq!(pack(&image, (16, 1)), vec![0x7F, 0xBE]);
    }

    #[test]
    fn padding_does_not_leak_into_next_row() {
        // 10 pixels wide: two bytes per row, six padding bits each
        let mut image = PixelBuffer::new(10, 2);
        image.set(9, 0, true);
        image.set(0, 1, true);

        let packed = pack(&image, (10, 2));
        assert_eq!(packed, vec![0xFF, 0xBF, 0x7F, 0xFF]);
    }

    #[test]
    fn unpack_restores_pixels() {
        let mut image = PixelBuffer::new(13, 5);
        for (x, y) in [(0, 0), (12, 0), (5, 2), (7, 3), (8, 3), (12, 4)] {
            image.set(x, y, true);
        }

        let packed = pack(&image, (13, 5));
        assert_eq!(unpack(&packed, 13, 5), image);
    }
}
