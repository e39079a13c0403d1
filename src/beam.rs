//! The video/input port: a small set of write-only registers in front of a
//! software beam.
//!
//! There is no framebuffer on the simulated hardware side. Register writes
//! take effect at the current beam position; pixels the beam has already
//! swept past cannot be changed. `wait_for_beam` advances the beam to a given
//! color clock within the scanline (rasterizing everything it sweeps with the
//! register state that was live at the time), and `end_scanline` finishes the
//! line. A write that arrives after the beam has passed a sprite copy
//! therefore misses that copy — exactly the deadline the painter races.

use crate::screen_buffer::ScreenBuffer;

/// Color clocks per scanline, horizontal blank included.
pub const CLOCKS_PER_LINE: u16 = 228;
/// Color clocks of horizontal blank at the start of every line.
pub const HBLANK_CLOCKS: u16 = 68;
/// Visible color clocks (one pixel each) per line.
pub const VISIBLE_CLOCKS: u16 = 160;

/// First scanline of the visible window.
pub const FIRST_VISIBLE_LINE: u16 = 40;
/// Number of visible scanlines.
pub const VISIBLE_LINES: u16 = 192;

/// Pattern bits per sprite.
pub const SPRITE_BITS: u16 = 8;
/// Each pattern bit covers two color clocks (double-width sprites).
pub const SPRITE_SCALE: u16 = 2;

/// Horizontal positions (visible pixels) of the two copies of each channel.
/// The copies interleave across the line as A B A B; rewriting both channels
/// while the beam is between the pairs turns that into A B C D.
pub const CHANNEL_COPIES: [[u16; 2]; 2] = [[12, 92], [52, 132]];

/// The beam clock at which both channels must be rewritten for the second
/// pair of copies: after the beam clears the first B copy, before it reaches
/// the second A copy.
pub const MID_SWAP_CLOCK: u16 = HBLANK_CLOCKS + 76;

/// Width of the background card drawn behind each tile position.
const CARD_SPAN: u16 = 24;
/// How far the card extends left of its sprite copy.
const CARD_LEAD: u16 = 4;

/// One of the two physical sprite channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    A = 0,
    B = 1,
}

/// Background fill selection: tile cards behind the sprite positions, or the
/// plain inter-row space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BandPattern {
    TileCards,
    Gap,
}

#[derive(Copy, Clone)]
struct SpriteChannel {
    pattern: u8,
    color: u8,
}

/// Register state plus beam position, rasterizing into a screen buffer.
pub struct Beam {
    scanline: u16,
    /// Beam position within the current line, in color clocks.
    hx: u16,
    vsync: bool,
    vblank: bool,
    background: u8,
    band: BandPattern,
    band_color: u8,
    channels: [SpriteChannel; 2],
    switches: u8,
    screen: ScreenBuffer,
    frame_scanlines: u16,
}

impl Beam {
    pub fn new() -> Self {
        Beam {
            scanline: 0,
            hx: 0,
            vsync: false,
            vblank: false,
            background: 0,
            band: BandPattern::Gap,
            band_color: 0,
            channels: [SpriteChannel { pattern: 0, color: 0 }; 2],
            switches: 0xFF,
            screen: ScreenBuffer::new(),
            frame_scanlines: 0,
        }
    }

    /// Start a new frame: beam back to the top-left, scanline counter reset.
    pub fn begin_frame(&mut self) {
        self.scanline = 0;
        self.hx = 0;
        self.frame_scanlines = 0;
    }

    pub fn set_vsync(&mut self, on: bool) {
        self.vsync = on;
    }

    pub fn set_vblank(&mut self, on: bool) {
        self.vblank = on;
    }

    pub fn set_sprite_pattern(&mut self, channel: Channel, pattern: u8) {
        self.channels[channel as usize].pattern = pattern;
    }

    pub fn set_sprite_color(&mut self, channel: Channel, color: u8) {
        self.channels[channel as usize].color = color;
    }

    pub fn set_background_color(&mut self, color: u8) {
        self.background = color;
    }

    pub fn set_band_color(&mut self, color: u8) {
        self.band_color = color;
    }

    pub fn set_band_pattern(&mut self, band: BandPattern) {
        self.band = band;
    }

    /// Advance the beam to the given color clock within the current line,
    /// rasterizing every pixel swept on the way. Synchronization barrier:
    /// register writes made before this call land on the swept pixels, writes
    /// made after it cannot.
    pub fn wait_for_beam(&mut self, clock: u16) {
        let clock = clock.min(CLOCKS_PER_LINE);
        self.rasterize(self.hx, clock);
        self.hx = self.hx.max(clock);
    }

    /// Sweep out the rest of the line and advance to the next scanline.
    pub fn end_scanline(&mut self) {
        self.rasterize(self.hx, CLOCKS_PER_LINE);
        self.hx = 0;
        self.scanline += 1;
        self.frame_scanlines += 1;
    }

    /// Current scanline within the frame.
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// Scanlines emitted since `begin_frame`.
    pub fn frame_scanlines(&self) -> u16 {
        self.frame_scanlines
    }

    /// The controller switch bitmask, active low. The frontend (or a test)
    /// sets it; the simulation only reads it.
    pub fn switches(&self) -> u8 {
        self.switches
    }

    pub fn set_switches(&mut self, switches: u8) {
        self.switches = switches;
    }

    pub fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    fn drawing(&self) -> bool {
        !self.vsync
            && !self.vblank
            && self.scanline >= FIRST_VISIBLE_LINE
            && self.scanline < FIRST_VISIBLE_LINE + VISIBLE_LINES
    }

    fn rasterize(&mut self, from: u16, to: u16) {
        if !self.drawing() {
            return;
        }
        let y = (self.scanline - FIRST_VISIBLE_LINE) as u32;
        for clock in from..to {
            if clock < HBLANK_CLOCKS {
                continue;
            }
            let x = clock - HBLANK_CLOCKS;
            let (r, g, b) = palette(self.pixel_color(x));
            self.screen.set_pixel(x as u32, y, r, g, b);
        }
    }

    /// Palette code for a visible pixel: sprite channels win over the band
    /// fill, which wins over the background.
    fn pixel_color(&self, x: u16) -> u8 {
        for (index, channel) in self.channels.iter().enumerate() {
            for &copy in &CHANNEL_COPIES[index] {
                if x >= copy && x < copy + SPRITE_BITS * SPRITE_SCALE {
                    let bit = (7 - (x - copy) / SPRITE_SCALE) as u8;
                    if channel.pattern & (1u8 << bit) != 0 {
                        return channel.color;
                    }
                }
            }
        }
        if self.band == BandPattern::TileCards && in_card(x) {
            return self.band_color;
        }
        self.background
    }
}

impl Default for Beam {
    fn default() -> Self {
        Self::new()
    }
}

/// True if the pixel sits on one of the four tile cards.
fn in_card(x: u16) -> bool {
    let mut positions = [0u16; 4];
    card_positions(&mut positions);
    positions
        .iter()
        .any(|&start| x >= start && x < start + CARD_SPAN)
}

fn card_positions(out: &mut [u16; 4]) {
    let mut i = 0;
    for pair in CHANNEL_COPIES {
        for copy in pair {
            out[i] = copy - CARD_LEAD;
            i += 1;
        }
    }
}

/// Convert a console palette code to RGB. 16 hues by 8 luminances; bit 0 of
/// the code is unused, as on the original hardware.
pub fn palette(code: u8) -> (u8, u8, u8) {
    const NTSC_PALETTE: [u32; 128] = [
        0x000000, 0x404040, 0x6C6C6C, 0x909090, 0xB0B0B0, 0xC8C8C8, 0xDCDCDC, 0xECECEC,
        0x444400, 0x646410, 0x848424, 0xA0A034, 0xB8B840, 0xD0D050, 0xE8E85C, 0xFCFC68,
        0x702800, 0x844414, 0x985C28, 0xAC783C, 0xBC8C4C, 0xCCA05C, 0xDCB468, 0xECC878,
        0x841800, 0x983418, 0xAC5030, 0xC06848, 0xD0805C, 0xE09470, 0xECA880, 0xFCBC94,
        0x880000, 0x9C2020, 0xB03C3C, 0xC05858, 0xD07070, 0xE08888, 0xECA0A0, 0xFCB4B4,
        0x78005C, 0x8C2074, 0xA03C88, 0xB0589C, 0xC070B0, 0xD084C0, 0xDC9CD0, 0xECB0E0,
        0x480078, 0x602090, 0x783CA4, 0x8C58B8, 0xA070CC, 0xB484DC, 0xC49CEC, 0xD4B0FC,
        0x140084, 0x302098, 0x4C3CAC, 0x6858C0, 0x7C70D0, 0x9488E0, 0xA8A0EC, 0xBCB4FC,
        0x000088, 0x1C209C, 0x3840B0, 0x505CC0, 0x6874D0, 0x7C8CE0, 0x90A4EC, 0xA4B8FC,
        0x00187C, 0x1C3890, 0x3854A8, 0x5070BC, 0x6888CC, 0x7C9CDC, 0x90B4EC, 0xA4C8FC,
        0x002C5C, 0x1C4C78, 0x386890, 0x5084AC, 0x689CC0, 0x7CB4D4, 0x90CCE8, 0xA4E0FC,
        0x003C2C, 0x1C5C48, 0x387C64, 0x509C80, 0x68B494, 0x7CD0AC, 0x90E4C0, 0xA4FCD4,
        0x003C00, 0x205C20, 0x407C40, 0x5C9C5C, 0x74B474, 0x8CD08C, 0xA4E4A4, 0xB8FCB8,
        0x143800, 0x345C1C, 0x507C38, 0x6C9850, 0x84B468, 0x9CCC7C, 0xB4E490, 0xC8FCA4,
        0x2C3000, 0x4C501C, 0x687034, 0x848C4C, 0x9CA864, 0xB4C078, 0xCCD488, 0xE0EC9C,
        0x442800, 0x644818, 0x846830, 0xA08444, 0xB89C58, 0xD0B46C, 0xE8CC7C, 0xFCE08C,
    ];
    let rgb = NTSC_PALETTE[(code >> 1) as usize & 0x7F];
    ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Advance a fresh beam to the first visible scanline.
    fn beam_at_visible_top() -> Beam {
        let mut beam = Beam::new();
        beam.begin_frame();
        for _ in 0..FIRST_VISIBLE_LINE {
            beam.end_scanline();
        }
        beam
    }

    #[test]
    fn test_pattern_written_in_hblank_shows_at_both_copies() {
        let mut beam = beam_at_visible_top();
        beam.set_sprite_color(Channel::A, 0x0E);
        beam.set_sprite_pattern(Channel::A, 0xFF);
        beam.end_scanline();

        let lit = palette(0x0E);
        let background = palette(0x00);
        for &copy in &CHANNEL_COPIES[0] {
            assert_eq!(beam.screen().get_pixel(copy as u32, 0), lit);
        }
        // Between the copies: background
        assert_eq!(beam.screen().get_pixel(40, 0), background);
    }

    #[test]
    fn test_mid_scanline_swap_splits_the_copies() {
        let mut beam = beam_at_visible_top();
        beam.set_sprite_color(Channel::A, 0x0E);

        // First copy gets a solid pattern, second copy a blank one.
        beam.set_sprite_pattern(Channel::A, 0xFF);
        beam.wait_for_beam(MID_SWAP_CLOCK);
        beam.set_sprite_pattern(Channel::A, 0x00);
        beam.end_scanline();

        let lit = palette(0x0E);
        let background = palette(0x00);
        assert_eq!(beam.screen().get_pixel(CHANNEL_COPIES[0][0] as u32, 0), lit);
        assert_eq!(
            beam.screen().get_pixel(CHANNEL_COPIES[0][1] as u32, 0),
            background,
            "pattern rewritten before the beam reached the second copy"
        );
    }

    #[test]
    fn test_late_write_misses_the_first_copy() {
        let mut beam = beam_at_visible_top();
        beam.set_sprite_color(Channel::A, 0x0E);

        // The beam is already past the first copy when the pattern lands.
        beam.wait_for_beam(MID_SWAP_CLOCK);
        beam.set_sprite_pattern(Channel::A, 0xFF);
        beam.end_scanline();

        let lit = palette(0x0E);
        let background = palette(0x00);
        assert_eq!(
            beam.screen().get_pixel(CHANNEL_COPIES[0][0] as u32, 0),
            background,
            "missed deadline: first copy was swept before the write"
        );
        assert_eq!(beam.screen().get_pixel(CHANNEL_COPIES[0][1] as u32, 0), lit);
    }

    #[test]
    fn test_double_width_sprite_pixels() {
        let mut beam = beam_at_visible_top();
        beam.set_sprite_color(Channel::B, 0x0E);
        beam.set_sprite_pattern(Channel::B, 0b1000_0000);
        beam.end_scanline();

        let lit = palette(0x0E);
        let background = palette(0x00);
        let copy = CHANNEL_COPIES[1][0] as u32;
        // The single set bit covers two pixels.
        assert_eq!(beam.screen().get_pixel(copy, 0), lit);
        assert_eq!(beam.screen().get_pixel(copy + 1, 0), lit);
        assert_eq!(beam.screen().get_pixel(copy + 2, 0), background);
    }

    #[test]
    fn test_band_pattern_draws_cards_behind_tiles() {
        let mut beam = beam_at_visible_top();
        beam.set_band_color(0x26);
        beam.set_band_pattern(BandPattern::TileCards);
        beam.end_scanline();

        let card = palette(0x26);
        let background = palette(0x00);
        assert_eq!(beam.screen().get_pixel(12, 0), card);
        assert_eq!(beam.screen().get_pixel(52, 0), card);
        assert_eq!(beam.screen().get_pixel(40, 0), background, "gap between cards");

        beam.set_band_pattern(BandPattern::Gap);
        beam.end_scanline();
        assert_eq!(beam.screen().get_pixel(12, 1), background);
    }

    #[test]
    fn test_vblank_suppresses_drawing() {
        let mut beam = beam_at_visible_top();
        beam.set_sprite_color(Channel::A, 0x0E);
        beam.set_sprite_pattern(Channel::A, 0xFF);
        beam.set_vblank(true);
        beam.end_scanline();
        assert_eq!(
            beam.screen().get_pixel(CHANNEL_COPIES[0][0] as u32, 0),
            (0, 0, 0)
        );
    }

    #[test]
    fn test_frame_scanline_counter() {
        let mut beam = Beam::new();
        beam.begin_frame();
        for _ in 0..100 {
            beam.end_scanline();
        }
        assert_eq!(beam.frame_scanlines(), 100);
        beam.begin_frame();
        assert_eq!(beam.frame_scanlines(), 0);
    }

    #[test]
    fn test_wait_for_beam_never_moves_backwards() {
        let mut beam = beam_at_visible_top();
        beam.wait_for_beam(MID_SWAP_CLOCK);
        beam.wait_for_beam(HBLANK_CLOCKS);
        beam.set_sprite_color(Channel::A, 0x0E);
        beam.set_sprite_pattern(Channel::A, 0xFF);
        beam.end_scanline();
        // The first copy was swept at the earlier wait; a backwards wait must
        // not reopen it.
        assert_eq!(
            beam.screen().get_pixel(CHANNEL_COPIES[0][0] as u32, 0),
            palette(0x00)
        );
    }
}
