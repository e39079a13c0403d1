pub mod beam;
pub mod console;
pub mod eventloop;
pub mod frame;
pub mod glyphs;
pub mod grid;
pub mod input;
pub mod moves;
pub mod painter;
pub mod resolver;
pub mod screen_buffer;
