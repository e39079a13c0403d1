/// ScreenBuffer holds RGB values for each visible pixel of the simulated
/// display: 160 pixels across the 192 visible scanlines.
pub struct ScreenBuffer {
    buffer: Vec<u8>,
}

impl ScreenBuffer {
    pub const WIDTH: u32 = 160;
    pub const HEIGHT: u32 = 192;
    const BYTES_PER_PIXEL: usize = 3; // RGB

    /// Creates a new black ScreenBuffer at the fixed display dimensions.
    pub fn new() -> Self {
        let buffer_size = (Self::WIDTH * Self::HEIGHT) as usize * Self::BYTES_PER_PIXEL;
        ScreenBuffer {
            buffer: vec![0; buffer_size],
        }
    }

    /// Calculates the buffer offset for a given pixel coordinate.
    fn pixel_offset(x: u32, y: u32) -> usize {
        ((y * Self::WIDTH + x) as usize) * Self::BYTES_PER_PIXEL
    }

    /// Sets the RGB color of a pixel at the specified coordinates.
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        let offset = Self::pixel_offset(x, y);
        self.buffer[offset] = r;
        self.buffer[offset + 1] = g;
        self.buffer[offset + 2] = b;
    }

    /// Gets the RGB color of a pixel at the specified coordinates.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let offset = Self::pixel_offset(x, y);
        (
            self.buffer[offset],
            self.buffer[offset + 1],
            self.buffer[offset + 2],
        )
    }

    /// Copies the entire buffer to the destination slice, which must be at
    /// least as large as the source buffer.
    pub fn copy_buffer(&self, dest: &mut [u8]) {
        dest[..self.buffer.len()].copy_from_slice(&self.buffer);
    }
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_screen_buffer_dimensions() {
        let screen_buffer = ScreenBuffer::new();
        assert_eq!(
            screen_buffer.buffer.len(),
            (ScreenBuffer::WIDTH * ScreenBuffer::HEIGHT) as usize * 3
        );
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut screen_buffer = ScreenBuffer::new();

        screen_buffer.set_pixel(0, 0, 255, 0, 0);
        assert_eq!(screen_buffer.get_pixel(0, 0), (255, 0, 0));

        screen_buffer.set_pixel(ScreenBuffer::WIDTH - 1, 0, 0, 255, 0);
        assert_eq!(screen_buffer.get_pixel(ScreenBuffer::WIDTH - 1, 0), (0, 255, 0));

        screen_buffer.set_pixel(0, ScreenBuffer::HEIGHT - 1, 0, 0, 255);
        assert_eq!(screen_buffer.get_pixel(0, ScreenBuffer::HEIGHT - 1), (0, 0, 255));

        screen_buffer.set_pixel(80, 96, 200, 100, 50);
        assert_eq!(screen_buffer.get_pixel(80, 96), (200, 100, 50));

        // Setting one pixel does not disturb another
        assert_eq!(screen_buffer.get_pixel(0, 0), (255, 0, 0));
    }

    #[test]
    fn test_initial_pixels_are_black() {
        let screen_buffer = ScreenBuffer::new();
        assert_eq!(screen_buffer.get_pixel(0, 0), (0, 0, 0));
        assert_eq!(screen_buffer.get_pixel(100, 100), (0, 0, 0));
        assert_eq!(
            screen_buffer.get_pixel(ScreenBuffer::WIDTH - 1, ScreenBuffer::HEIGHT - 1),
            (0, 0, 0)
        );
    }

    #[test]
    fn test_copy_buffer() {
        let mut source = ScreenBuffer::new();
        source.set_pixel(0, 0, 255, 0, 0);
        source.set_pixel(10, 10, 0, 255, 0);

        let mut dest = vec![0u8; (ScreenBuffer::WIDTH * ScreenBuffer::HEIGHT) as usize * 3];
        source.copy_buffer(&mut dest);

        assert_eq!(&dest[0..3], &[255, 0, 0]);
        let offset = ((10 * ScreenBuffer::WIDTH + 10) as usize) * 3;
        assert_eq!(&dest[offset..offset + 3], &[0, 255, 0]);
    }
}
