//! SDL2 window sink
//!
//! Shows each frame upscaled with nearest-neighbour sampling. ESC or closing
//! the window ends the session.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture};
use sdl2::video::Window;
use sdl2::{EventPump, Sdl};

use paa3905_display::{
    gray_to_rgb, scaled_side, upscale, DisplayError, FrameSink, SinkControl, WINDOW_TITLE,
};
use paa3905_protocol::Frame;

use super::SinkError;

fn sdl_err(e: impl ToString) -> SinkError {
    SinkError::Sdl(e.to_string())
}

pub struct SdlSink {
    // Freed together with the canvas renderer
    texture: Texture,
    canvas: Canvas<Window>,
    events: EventPump,
    scale: usize,
    side: usize,
    scaled: Vec<u8>,
    rgb: Vec<u8>,
    // Dropped last; owns the SDL subsystems
    _context: Sdl,
}

impl SdlSink {
    /// Open a window sized for frames upscaled by `scale`
    pub fn open(scale: usize) -> Result<Self, SinkError> {
        let side = scaled_side(scale)?;
        let side_px = u32::try_from(side).map_err(|_| DisplayError::InvalidScale)?;
        let context = sdl2::init().map_err(sdl_err)?;
        let video = context.video().map_err(sdl_err)?;
        let window = video
            .window(WINDOW_TITLE, side_px, side_px)
            .position_centered()
            .build()
            .map_err(sdl_err)?;
        let canvas = window.into_canvas().build().map_err(sdl_err)?;
        let texture = canvas
            .texture_creator()
            .create_texture_streaming(PixelFormatEnum::RGB24, side_px, side_px)
            .map_err(sdl_err)?;
        let events = context.event_pump().map_err(sdl_err)?;

        log::info!("Opened {side}x{side} SDL window");

        Ok(Self {
            texture,
            canvas,
            events,
            scale,
            side,
            scaled: vec![0; side * side],
            rgb: vec![0; side * side * 3],
            _context: context,
        })
    }
}

impl FrameSink for SdlSink {
    type Error = SinkError;

    fn present(&mut self, frame: &Frame) -> Result<SinkControl, Self::Error> {
        upscale(frame, self.scale, &mut self.scaled)?;
        gray_to_rgb(&self.scaled, &mut self.rgb)?;

        self.texture
            .update(None, &self.rgb, self.side * 3)
            .map_err(sdl_err)?;
        self.canvas.copy(&self.texture, None, None).map_err(sdl_err)?;
        self.canvas.present();

        self.poll()
    }

    fn poll(&mut self) -> Result<SinkControl, Self::Error> {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return Ok(SinkControl::Quit),
                _ => {}
            }
        }
        Ok(SinkControl::Continue)
    }
}
