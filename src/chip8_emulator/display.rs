use crate::chip8_emulator::config::{
    DEFAULT_PLANE_MASK, HORIZONTAL_SCROLL, SCREEN_HEIGHT_HIGH, SCREEN_HEIGHT_LOW,
    SCREEN_WIDTH_HIGH, SCREEN_WIDTH_LOW,
};
use crate::chip8_emulator::memory::Memory;

/// Bit-plane framebuffer. One flat `bool` bitmap per plane, row-major.
///
/// Every operation except resolution switching only touches the planes selected
/// by `plane_mask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    planes: Vec<Vec<bool>>,
    high_resolution: bool,
    plane_mask: u8,
}

impl Display {
    pub fn new(number_of_planes: usize) -> Self {
        let mut display = Self {
            planes: vec![Vec::new(); number_of_planes],
            high_resolution: false,
            plane_mask: DEFAULT_PLANE_MASK,
        };
        display.initialise();
        display
    }

    /// Low resolution, lowest plane selected, every plane blank.
    pub fn initialise(&mut self) {
        self.high_resolution = false;
        self.plane_mask = DEFAULT_PLANE_MASK;
        self.reallocate();
        for plane in &mut self.planes {
            plane.fill(false);
        }
    }

    pub fn number_of_planes(&self) -> usize {
        self.planes.len()
    }

    pub fn number_of_colours(&self) -> usize {
        1 << self.planes.len()
    }

    pub fn width(&self) -> usize {
        if self.high_resolution {
            SCREEN_WIDTH_HIGH
        } else {
            SCREEN_WIDTH_LOW
        }
    }

    pub fn height(&self) -> usize {
        if self.high_resolution {
            SCREEN_HEIGHT_HIGH
        } else {
            SCREEN_HEIGHT_LOW
        }
    }

    pub fn high_resolution(&self) -> bool {
        self.high_resolution
    }

    pub fn low_resolution(&self) -> bool {
        !self.high_resolution
    }

    /// Switches resolution without clearing: each plane keeps the first
    /// `min(old, new)` cells of its previous buffer, positionally.
    pub fn set_high_resolution(&mut self, high_resolution: bool) {
        self.high_resolution = high_resolution;
        self.reallocate();
    }

    pub fn plane_mask(&self) -> u8 {
        self.plane_mask
    }

    pub fn set_plane_mask(&mut self, mask: u8) {
        self.plane_mask = mask;
    }

    pub fn plane(&self, plane: usize) -> &[bool] {
        &self.planes[plane]
    }

    pub fn pixel(&self, plane: usize, x: usize, y: usize) -> bool {
        self.planes[plane][x + y * self.width()]
    }

    pub fn set_pixel(&mut self, plane: usize, x: usize, y: usize, lit: bool) {
        let width = self.width();
        self.planes[plane][x + y * width] = lit;
    }

    /// Palette index of a cell: bit `p` is set when plane `p` is lit.
    pub fn colour_index(&self, x: usize, y: usize) -> u8 {
        let cell = x + y * self.width();
        self.planes
            .iter()
            .enumerate()
            .fold(0, |index, (plane, pixels)| index | (u8::from(pixels[cell]) << plane))
    }

    fn is_plane_selected(&self, plane: usize) -> bool {
        plane < 8 && self.plane_mask & (1 << plane) != 0
    }

    fn selected_planes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.planes.len()).filter(move |&plane| self.is_plane_selected(plane))
    }

    fn reallocate(&mut self) {
        let size = self.width() * self.height();
        for plane in &mut self.planes {
            plane.resize(size, false);
        }
    }

    /// XORs a `width`×`height` sprite into every selected plane. Sprite data for
    /// consecutive selected planes is stored back to back from `address`.
    ///
    /// Returns the number of sprite rows that erased a lit pixel or ran off the
    /// bottom edge, summed over the planes drawn.
    pub fn draw(
        &mut self,
        memory: &Memory,
        address: usize,
        draw_x: usize,
        draw_y: usize,
        width: usize,
        height: usize,
    ) -> usize {
        let bytes_per_row = width / 8;
        let planes: Vec<usize> = self.selected_planes().collect();

        let mut hits = 0;
        let mut address = address;
        for plane in planes {
            hits += self.draw_plane(plane, memory, address, draw_x, draw_y, width, height);
            address += height * bytes_per_row;
        }

        hits
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_plane(
        &mut self,
        plane: usize,
        memory: &Memory,
        address: usize,
        draw_x: usize,
        draw_y: usize,
        width: usize,
        height: usize,
    ) -> usize {
        let screen_width = self.width();
        let screen_height = self.height();
        let bytes_per_row = width / 8;
        let pixels = &mut self.planes[plane];

        let mut rows_hit = 0;
        for row in 0..height {
            let cell_y = draw_y + row;
            let row_address = address + row * bytes_per_row;
            let mut row_hit = false;

            for column in 0..width {
                let sprite_byte = memory.get(row_address + column / 8);
                if sprite_byte & (0x80 >> (column % 8)) == 0 {
                    continue;
                }

                let cell_x = draw_x + column;
                if cell_x < screen_width && cell_y < screen_height {
                    let cell = cell_x + cell_y * screen_width;
                    row_hit |= pixels[cell];
                    pixels[cell] ^= true;
                } else if cell_y >= screen_height {
                    // Rows running off the bottom count as colliding.
                    row_hit = true;
                }
            }

            if row_hit {
                rows_hit += 1;
            }
        }

        rows_hit
    }

    pub fn clear(&mut self) {
        let planes: Vec<usize> = self.selected_planes().collect();
        for plane in planes {
            self.planes[plane].fill(false);
        }
    }

    pub fn clear_row(&mut self, row: usize) {
        let width = self.width();
        let planes: Vec<usize> = self.selected_planes().collect();
        for plane in planes {
            self.planes[plane][row * width..(row + 1) * width].fill(false);
        }
    }

    pub fn clear_column(&mut self, column: usize) {
        let width = self.width();
        let height = self.height();
        let planes: Vec<usize> = self.selected_planes().collect();
        for plane in planes {
            for y in 0..height {
                self.planes[plane][column + y * width] = false;
            }
        }
    }

    pub fn copy_row(&mut self, source: usize, destination: usize) {
        let width = self.width();
        let planes: Vec<usize> = self.selected_planes().collect();
        for plane in planes {
            self.planes[plane].copy_within(source * width..(source + 1) * width, destination * width);
        }
    }

    pub fn copy_column(&mut self, source: usize, destination: usize) {
        let width = self.width();
        let height = self.height();
        let planes: Vec<usize> = self.selected_planes().collect();
        for plane in planes {
            let pixels = &mut self.planes[plane];
            for y in 0..height {
                pixels[destination + y * width] = pixels[source + y * width];
            }
        }
    }

    /// Moves content down `n` rows, blanking the top `n`.
    pub fn scroll_down(&mut self, n: usize) {
        let height = self.height();
        let n = n.min(height);
        for y in (0..height - n).rev() {
            self.copy_row(y, y + n);
        }
        for y in 0..n {
            self.clear_row(y);
        }
    }

    /// Moves content up `n` rows, blanking the bottom `n`.
    pub fn scroll_up(&mut self, n: usize) {
        let height = self.height();
        let n = n.min(height);
        for y in 0..height - n {
            self.copy_row(y + n, y);
        }
        for y in 0..n {
            self.clear_row(height - y - 1);
        }
    }

    /// Moves content right by four columns. Columns `0..4` are blanked and the
    /// rightmost four are discarded.
    pub fn scroll_right(&mut self) {
        let width = self.width();
        let n = HORIZONTAL_SCROLL;
        for x in (0..width - n).rev() {
            self.copy_column(x, x + n);
        }
        for x in 0..n {
            self.clear_column(x);
        }
    }

    /// Moves content left by four columns. Columns `width-4..width` are blanked
    /// and the leftmost four are discarded.
    pub fn scroll_left(&mut self) {
        let width = self.width();
        let n = HORIZONTAL_SCROLL;
        for x in 0..width - n {
            self.copy_column(x + n, x);
        }
        for x in 0..n {
            self.clear_column(width - x - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sprite_memory(bytes: &[u8]) -> Memory {
        let mut memory = Memory::new(4096).unwrap();
        memory.load(0x300, bytes);
        memory
    }

    #[test]
    fn draw_counts_rows_not_pixels() {
        let mut display = Display::new(1);
        let memory = sprite_memory(&[0xFF, 0xFF]);

        assert_eq!(display.draw(&memory, 0x300, 0, 0, 8, 2), 0);
        assert_eq!(display.draw(&memory, 0x300, 0, 0, 8, 2), 2);
        assert!(display.plane(0).iter().all(|&lit| !lit));
    }

    #[test]
    fn rows_off_the_bottom_collide_but_columns_off_the_side_do_not() {
        let mut display = Display::new(1);
        let memory = sprite_memory(&[0x80, 0x80, 0x80]);

        assert_eq!(display.draw(&memory, 0x300, 10, 30, 8, 3), 1);
        assert!(display.pixel(0, 10, 30));
        assert!(display.pixel(0, 10, 31));

        let memory = sprite_memory(&[0x01]);
        assert_eq!(display.draw(&memory, 0x300, 60, 0, 8, 1), 0);
        assert!(display.plane(0)[..64].iter().all(|&lit| !lit));
    }

    #[test]
    fn sixteen_wide_sprites_read_two_bytes_per_row() {
        let mut display = Display::new(1);
        display.set_high_resolution(true);
        let memory = sprite_memory(&[0x80, 0x01]);

        display.draw(&memory, 0x300, 0, 0, 16, 1);

        assert!(display.pixel(0, 0, 0));
        assert!(display.pixel(0, 15, 0));
        assert!(!display.pixel(0, 8, 0));
    }

    #[test]
    fn planes_consume_consecutive_sprite_data() {
        let mut display = Display::new(2);
        display.set_plane_mask(0x3);
        let memory = sprite_memory(&[0x80, 0x40]);

        display.draw(&memory, 0x300, 0, 0, 8, 1);

        assert_eq!(display.colour_index(0, 0), 0b01);
        assert_eq!(display.colour_index(1, 0), 0b10);
    }

    #[test]
    fn unselected_planes_are_untouched() {
        let mut display = Display::new(2);
        display.set_plane_mask(0x2);
        display.set_pixel(0, 3, 3, true);

        display.clear();

        assert!(display.pixel(0, 3, 3));
        let memory = sprite_memory(&[0x80]);
        display.draw(&memory, 0x300, 0, 0, 8, 1);
        assert!(!display.pixel(0, 0, 0));
        assert!(display.pixel(1, 0, 0));
    }

    #[test]
    fn resolution_switch_keeps_prefix() {
        let mut display = Display::new(1);
        display.set_pixel(0, 5, 1, true);
        let low = display.plane(0).to_vec();

        display.set_high_resolution(true);
        assert_eq!(&display.plane(0)[..low.len()], &low[..]);
        assert!(display.plane(0)[low.len()..].iter().all(|&lit| !lit));
        // Cell 69 in low resolution is (5, 0) at 128 pixels per row.
        assert!(display.pixel(0, 69, 0));

        display.set_high_resolution(false);
        assert_eq!(display.plane(0), &low[..]);
    }

    #[test]
    fn scroll_down_moves_rows_and_blanks_top() {
        let mut display = Display::new(1);
        display.set_high_resolution(true);
        display.set_pixel(0, 7, 0, true);

        display.scroll_down(4);

        assert!(display.pixel(0, 7, 4));
        for y in 0..4 {
            assert!(!display.pixel(0, 7, y));
        }
    }

    #[test]
    fn scroll_up_moves_rows_and_blanks_bottom() {
        let mut display = Display::new(1);
        display.set_pixel(0, 0, 31, true);
        display.set_pixel(0, 1, 2, true);

        display.scroll_up(2);

        assert!(display.pixel(0, 0, 29));
        assert!(display.pixel(0, 1, 0));
        assert!(!display.pixel(0, 0, 31));
        assert!(!display.pixel(0, 0, 30));
    }

    #[test]
    fn scroll_right_discards_the_right_edge() {
        let mut display = Display::new(1);
        display.set_pixel(0, 0, 0, true);
        display.set_pixel(0, 63, 0, true);

        display.scroll_right();

        assert!(display.pixel(0, 4, 0));
        assert_eq!(display.plane(0)[..64].iter().filter(|&&lit| lit).count(), 1);
    }

    #[test]
    fn scroll_left_blanks_the_right_edge() {
        let mut display = Display::new(1);
        display.set_pixel(0, 63, 5, true);
        display.set_pixel(0, 2, 5, true);

        display.scroll_left();

        assert!(display.pixel(0, 59, 5));
        for x in 60..64 {
            assert!(!display.pixel(0, x, 5));
        }
        assert!(!display.pixel(0, 2, 5));
    }
}
