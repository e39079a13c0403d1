use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::console::Console;
use crate::input::{SWITCH_DOWN, SWITCH_LEFT, SWITCH_RIGHT, SWITCH_UP};
use crate::screen_buffer::ScreenBuffer;

/// EventLoop manages the SDL2 event loop for the application.
/// It maps the arrow keys onto the controller switches, runs one simulated
/// frame per displayed frame, and exits when Escape is pressed or the window
/// is closed.
pub struct EventLoop {
    _sdl_context: sdl2::Sdl,
    canvas: Option<Canvas<Window>>,
    event_pump: sdl2::EventPump,
    switches: u8,
}

impl EventLoop {
    const MIN_SCALE: f32 = 1.0;
    const MAX_SCALE: f32 = 8.0;
    const CLEAR_COLOR_R: u8 = 0;
    const CLEAR_COLOR_G: u8 = 0;
    const CLEAR_COLOR_B: u8 = 0;

    /// Creates a new EventLoop instance.
    ///
    /// # Arguments
    ///
    /// * `headless` - If `true`, creates an EventLoop without a window
    ///                (useful for testing). If `false`, creates a window
    ///                sized for the 160x192 display.
    /// * `video_scale` - Window scaling factor. Values are clamped to the
    ///                   range [1.0, 8.0] with a warning printed on clamping.
    ///
    /// # Errors
    ///
    /// Returns an error if SDL2 initialization fails, the event pump cannot
    /// be created, or (when `headless` is `false`) the window cannot be
    /// created.
    pub fn new(headless: bool, video_scale: f32) -> Result<Self, String> {
        let clamped_scale = Self::clamp_scale(video_scale);

        let sdl_context = sdl2::init()?;
        let event_pump = sdl_context.event_pump()?;

        let canvas = if headless {
            None
        } else {
            Some(Self::create_window_and_canvas(&sdl_context, clamped_scale)?)
        };

        Ok(EventLoop {
            _sdl_context: sdl_context,
            canvas,
            event_pump,
            switches: 0xFF,
        })
    }

    /// Clamps the video scaling factor to the valid range [1.0, 8.0].
    /// Prints a warning to stderr if clamping occurs.
    fn clamp_scale(scale: f32) -> f32 {
        if scale < Self::MIN_SCALE {
            eprintln!(
                "Warning: Video scaling factor {} is below minimum {}. Clamping to {}.",
                scale,
                Self::MIN_SCALE,
                Self::MIN_SCALE
            );
            Self::MIN_SCALE
        } else if scale > Self::MAX_SCALE {
            eprintln!(
                "Warning: Video scaling factor {} is above maximum {}. Clamping to {}.",
                scale,
                Self::MAX_SCALE,
                Self::MAX_SCALE
            );
            Self::MAX_SCALE
        } else {
            scale
        }
    }

    /// Creates a window matching the display dimensions, scaled by the given
    /// factor. Returns a canvas for rendering.
    fn create_window_and_canvas(
        sdl_context: &sdl2::Sdl,
        scale: f32,
    ) -> Result<Canvas<Window>, String> {
        let scaled_width = (ScreenBuffer::WIDTH as f32 * scale) as u32;
        let scaled_height = (ScreenBuffer::HEIGHT as f32 * scale) as u32;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window("Tilebeam", scaled_width, scaled_height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        canvas.set_draw_color(sdl2::pixels::Color::RGB(
            Self::CLEAR_COLOR_R,
            Self::CLEAR_COLOR_G,
            Self::CLEAR_COLOR_B,
        ));
        canvas.clear();
        canvas.present();

        Ok(canvas)
    }

    /// Switch bit for a keycode, if the key maps to a direction.
    fn switch_for_key(keycode: Keycode) -> Option<u8> {
        match keycode {
            Keycode::Up => Some(SWITCH_UP),
            Keycode::Down => Some(SWITCH_DOWN),
            Keycode::Left => Some(SWITCH_LEFT),
            Keycode::Right => Some(SWITCH_RIGHT),
            _ => None,
        }
    }

    /// Applies one event to the switch sample. Returns `true` if the event
    /// requests quitting.
    fn handle_event(switches: &mut u8, event: Event) -> bool {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => return true,
            Event::KeyDown {
                keycode: Some(key), ..
            } => {
                // Switches are active low: pressing pulls the bit to 0.
                if let Some(bit) = Self::switch_for_key(key) {
                    *switches &= !bit;
                }
            }
            Event::KeyUp {
                keycode: Some(key), ..
            } => {
                if let Some(bit) = Self::switch_for_key(key) {
                    *switches |= bit;
                }
            }
            _ => {}
        }
        false
    }

    /// Renders the current frame from the console screen buffer.
    fn render_frame(
        canvas: &mut Canvas<Window>,
        texture: &mut sdl2::render::Texture,
        console: &Console,
    ) -> Result<(), String> {
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                let screen = console.screen();
                if pitch == ScreenBuffer::WIDTH as usize * 3 {
                    // Fast path: direct buffer copy
                    screen.copy_buffer(buffer);
                } else {
                    // Slow path: copy row by row to handle non-standard pitch
                    for y in 0..ScreenBuffer::HEIGHT {
                        for x in 0..ScreenBuffer::WIDTH {
                            let (r, g, b) = screen.get_pixel(x, y);
                            let offset = (y as usize * pitch) + (x as usize * 3);
                            buffer[offset] = r;
                            buffer[offset + 1] = g;
                            buffer[offset + 2] = b;
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        canvas.set_draw_color(sdl2::pixels::Color::RGB(
            Self::CLEAR_COLOR_R,
            Self::CLEAR_COLOR_G,
            Self::CLEAR_COLOR_B,
        ));
        canvas.clear();
        canvas
            .copy(texture, None, None)
            .map_err(|e| e.to_string())?;
        canvas.present();

        Ok(())
    }

    /// Runs the event loop, processing events until the user presses Escape
    /// or closes the window.
    ///
    /// Runs one simulated frame per iteration and paces the loop to ~60 FPS.
    ///
    /// # Errors
    ///
    /// Returns an error if texture creation or rendering fails.
    pub fn run(&mut self, console: &mut Console) -> Result<(), String> {
        if let Some(ref mut canvas) = self.canvas {
            let texture_creator = canvas.texture_creator();
            let mut texture = texture_creator
                .create_texture_streaming(
                    PixelFormatEnum::RGB24,
                    ScreenBuffer::WIDTH,
                    ScreenBuffer::HEIGHT,
                )
                .map_err(|e| e.to_string())?;

            let timer = self._sdl_context.timer()?;
            let mut last_frame_time = timer.performance_counter();
            let performance_frequency = timer.performance_frequency() as f64;

            loop {
                // 1. Poll ALL events (non-blocking)
                for event in self.event_pump.poll_iter() {
                    if Self::handle_event(&mut self.switches, event) {
                        return Ok(());
                    }
                }

                // 2. Run one simulated frame with the latched switch sample
                console.set_switches(self.switches);
                console.run_frame();

                // 3. Render the frame
                Self::render_frame(canvas, &mut texture, console)?;

                // 4. Frame limiting - maintain ~60 FPS
                let current_time = timer.performance_counter();
                let elapsed_ticks = (current_time - last_frame_time) as f64;
                let elapsed_seconds = elapsed_ticks / performance_frequency;
                let target_frame_time = 1.0 / 60.0;

                last_frame_time = current_time;

                if elapsed_seconds < target_frame_time {
                    let sleep_time = target_frame_time - elapsed_seconds;
                    std::thread::sleep(std::time::Duration::from_secs_f64(sleep_time));
                }
            }
        } else {
            // Headless mode - just run without rendering
            loop {
                for event in self.event_pump.poll_iter() {
                    if Self::handle_event(&mut self.switches, event) {
                        return Ok(());
                    }
                }
                console.set_switches(self.switches);
                console.run_frame();
            }
        }
    }
}
