//! Frame buffer and display backends.
//!
//! Frames are drawn into an in-memory [`FrameBuffer`] and then handed to a
//! [`DisplaySink`] in one piece, the same way a panel driver flushes a
//! framebuffer over SPI.
//!
//! | Backend | Output |
//! |---------|--------|
//! | [`SnapshotDisplay`] | PNG file, replaced atomically on every frame |
//! | [`HeadlessDisplay`] | Nothing (frames are counted and logged) |
//! | `WindowDisplay` | embedded-graphics-simulator window (`simulator` feature) |

use std::convert::Infallible;
use std::path::PathBuf;

use airmon_common::colors::BLACK;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tracing::debug;

use crate::config::{DisplayBackend, DisplayConfig};
use crate::error::DisplayError;

// =============================================================================
// Frame Buffer
// =============================================================================

/// Row-major RGB frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![BLACK; size.width as usize * size.height as usize],
        }
    }

    #[inline]
    fn index(
        &self,
        point: Point,
    ) -> Option<usize> {
        let in_bounds =
            point.x >= 0 && point.y >= 0 && (point.x as u32) < self.size.width && (point.y as u32) < self.size.height;
        in_bounds.then(|| point.y as usize * self.size.width as usize + point.x as usize)
    }

    /// Color at `point`, or `None` outside the frame.
    #[cfg(test)]
    pub fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb888> {
        self.index(point).map(|idx| self.pixels[idx])
    }

    #[cfg(any(test, feature = "simulator"))]
    #[inline]
    pub fn pixels(&self) -> &[Rgb888] { &self.pixels }

    /// Packed 8-bit RGB, three bytes per pixel.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r(), c.g(), c.b()])
            .collect()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point) {
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let width = self.size.width as usize;
        for y in area.rows() {
            let row = y as usize * width;
            let columns = area.columns();
            self.pixels[row + columns.start as usize..row + columns.end as usize].fill(color);
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// A physical or virtual panel.
pub trait DisplaySink {
    fn name(&self) -> &'static str;

    /// Show a complete frame.
    fn display(
        &mut self,
        frame: &FrameBuffer,
    ) -> Result<(), DisplayError>;

    fn set_backlight(
        &mut self,
        on: bool,
    ) -> Result<(), DisplayError>;

    /// Whether the user asked to close the display (window backends only).
    fn quit_requested(&mut self) -> bool { false }
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn name(&self) -> &'static str { (**self).name() }

    fn display(
        &mut self,
        frame: &FrameBuffer,
    ) -> Result<(), DisplayError> {
        (**self).display(frame)
    }

    fn set_backlight(
        &mut self,
        on: bool,
    ) -> Result<(), DisplayError> {
        (**self).set_backlight(on)
    }

    fn quit_requested(&mut self) -> bool { (**self).quit_requested() }
}

/// Writes every frame to a PNG file.
///
/// The file is written next to its destination and renamed into place, so a
/// reader never sees a partial image. Switching the backlight off replaces
/// the snapshot with a black frame of the last known size.
pub struct SnapshotDisplay {
    path: PathBuf,
    last_size: Option<Size>,
}

impl SnapshotDisplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_size: None,
        }
    }

    fn write_png(
        &self,
        frame: &FrameBuffer,
    ) -> Result<(), DisplayError> {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let size = frame.size();
        image::save_buffer_with_format(
            &staging,
            &frame.to_rgb_bytes(),
            size.width,
            size.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl DisplaySink for SnapshotDisplay {
    fn name(&self) -> &'static str { "snapshot" }

    fn display(
        &mut self,
        frame: &FrameBuffer,
    ) -> Result<(), DisplayError> {
        self.write_png(frame)?;
        self.last_size = Some(frame.size());
        Ok(())
    }

    fn set_backlight(
        &mut self,
        on: bool,
    ) -> Result<(), DisplayError> {
        match (on, self.last_size) {
            (false, Some(size)) => self.write_png(&FrameBuffer::new(size)),
            _ => Ok(()),
        }
    }
}

/// Accepts frames without showing them.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames: u64,
    backlight: bool,
}

#[cfg(test)]
impl HeadlessDisplay {
    #[inline]
    pub const fn frames(&self) -> u64 { self.frames }

    #[inline]
    pub const fn backlight(&self) -> bool { self.backlight }
}

impl DisplaySink for HeadlessDisplay {
    fn name(&self) -> &'static str { "headless" }

    fn display(
        &mut self,
        _frame: &FrameBuffer,
    ) -> Result<(), DisplayError> {
        self.frames += 1;
        debug!(frames = self.frames, "frame discarded");
        Ok(())
    }

    fn set_backlight(
        &mut self,
        on: bool,
    ) -> Result<(), DisplayError> {
        self.backlight = on;
        debug!(backlight = self.backlight, "headless backlight");
        Ok(())
    }
}

#[cfg(feature = "simulator")]
pub use window::WindowDisplay;

#[cfg(feature = "simulator")]
mod window {
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;
    use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

    use super::{DisplaySink, FrameBuffer};
    use crate::error::DisplayError;

    /// Desktop preview window, scaled 2x.
    pub struct WindowDisplay {
        display: SimulatorDisplay<Rgb888>,
        window: Window,
        shown: bool,
        quit: bool,
    }

    impl WindowDisplay {
        pub fn new(size: Size) -> Self {
            let output_settings = OutputSettingsBuilder::new().scale(2).build();
            Self {
                display: SimulatorDisplay::new(size),
                window: Window::new("Air Quality Monitor", &output_settings),
                shown: false,
                quit: false,
            }
        }

        fn refresh(&mut self) {
            self.window.update(&self.display);
            self.shown = true;
        }
    }

    impl DisplaySink for WindowDisplay {
        fn name(&self) -> &'static str { "simulator" }

        fn display(
            &mut self,
            frame: &FrameBuffer,
        ) -> Result<(), DisplayError> {
            let area = Rectangle::new(Point::zero(), frame.size());
            self.display
                .fill_contiguous(&area, frame.pixels().iter().copied())
                .ok();
            self.refresh();
            Ok(())
        }

        fn set_backlight(
            &mut self,
            on: bool,
        ) -> Result<(), DisplayError> {
            if !on {
                self.display.clear(Rgb888::BLACK).ok();
                self.refresh();
            }
            Ok(())
        }

        fn quit_requested(&mut self) -> bool {
            // The window must be drawn once before it can deliver events
            if self.shown && self.window.events().any(|ev| matches!(ev, SimulatorEvent::Quit)) {
                self.quit = true;
            }
            self.quit
        }
    }
}

/// Build the display selected by `config`, with `backend` overriding the configured one.
pub fn open(
    config: &DisplayConfig,
    backend: Option<DisplayBackend>,
) -> Result<Box<dyn DisplaySink>, DisplayError> {
    match backend.unwrap_or(config.backend) {
        DisplayBackend::Snapshot => Ok(Box::new(SnapshotDisplay::new(&config.snapshot_path))),
        DisplayBackend::Headless => Ok(Box::new(HeadlessDisplay::default())),
        #[cfg(feature = "simulator")]
        DisplayBackend::Simulator => Ok(Box::new(WindowDisplay::new(config.size()))),
        #[cfg(not(feature = "simulator"))]
        DisplayBackend::Simulator => Err(DisplayError::Unsupported("simulator")),
    }
}

#[cfg(test)]
mod tests {
    use airmon_common::colors::WHITE;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    use super::*;

    #[test]
    fn test_frame_buffer_starts_black() {
        let frame = FrameBuffer::new(Size::new(4, 3));
        assert_eq!(frame.pixels().len(), 12);
        assert!(frame.pixels().iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_out_of_bounds_pixels_dropped() {
        let mut frame = FrameBuffer::new(Size::new(4, 3));
        Pixel(Point::new(-1, 0), WHITE).draw(&mut frame).ok();
        Pixel(Point::new(4, 0), WHITE).draw(&mut frame).ok();
        Pixel(Point::new(0, 3), WHITE).draw(&mut frame).ok();
        assert!(frame.pixels().iter().all(|&p| p == BLACK));
        assert_eq!(frame.pixel(Point::new(4, 0)), None);
    }

    #[test]
    fn test_fill_solid_clipped() {
        let mut frame = FrameBuffer::new(Size::new(4, 3));
        Rectangle::new(Point::new(2, 1), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(WHITE))
            .draw(&mut frame)
            .ok();
        assert_eq!(frame.pixel(Point::new(1, 1)), Some(BLACK));
        assert_eq!(frame.pixel(Point::new(2, 1)), Some(WHITE));
        assert_eq!(frame.pixel(Point::new(3, 2)), Some(WHITE));
        assert_eq!(frame.pixel(Point::new(2, 0)), Some(BLACK));
    }

    #[test]
    fn test_rgb_bytes_row_major() {
        let mut frame = FrameBuffer::new(Size::new(2, 1));
        Pixel(Point::new(1, 0), Rgb888::new(1, 2, 3)).draw(&mut frame).ok();
        assert_eq!(frame.to_rgb_bytes(), vec![0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_snapshot_writes_png() {
        let path = std::env::temp_dir().join(format!("airmon-snapshot-{}.png", std::process::id()));
        let mut sink = SnapshotDisplay::new(&path);

        let mut frame = FrameBuffer::new(Size::new(8, 6));
        frame.clear(WHITE).ok();
        sink.display(&frame).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 6));
        assert_eq!(img.get_pixel(3, 3).0, [255, 255, 255]);

        // Backlight off blanks the snapshot
        sink.set_backlight(false).unwrap();
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(3, 3).0, [0, 0, 0]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_headless_counts_frames() {
        let mut sink = HeadlessDisplay::default();
        let frame = FrameBuffer::new(Size::new(2, 2));
        sink.display(&frame).unwrap();
        sink.display(&frame).unwrap();
        sink.set_backlight(true).unwrap();
        assert_eq!(sink.frames(), 2);
        assert!(sink.backlight());
        assert!(!sink.quit_requested());
    }

    #[cfg(not(feature = "simulator"))]
    #[test]
    fn test_simulator_requires_feature() {
        let err = open(&DisplayConfig::default(), Some(DisplayBackend::Simulator)).err();
        assert!(matches!(err, Some(DisplayError::Unsupported("simulator"))));
    }
}
