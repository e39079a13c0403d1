use tilebeam::console::Console;
use tilebeam::eventloop::EventLoop;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional scale argument, e.g. `tilebeam 3`
    let args: Vec<String> = std::env::args().collect();
    let scale: f32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(4.0);

    let mut event_loop = EventLoop::new(false, scale)?;
    let mut console = Console::new();

    event_loop.run(&mut console).map_err(|e| e.into())
}
