//! Display pipeline: backlight gating, frame composition and hand-off.
//!
//! Outside the daytime window the pipeline switches the backlight off and
//! skips rendering entirely. The backlight is only switched when the wanted
//! state differs from the last state the sink accepted.

use airmon_common::frame::{FrameLayout, Readouts};
use airmon_common::{BacklightSchedule, ChartDomain};
use embedded_graphics::prelude::Size;
use tracing::{info, warn};

use crate::display::{DisplaySink, FrameBuffer};

/// What happened to a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presented {
    /// Frame drawn and sent; carries the chart domain when a line was plotted.
    Rendered(Option<ChartDomain>),
    /// Night time: nothing drawn, backlight off.
    Suppressed,
}

pub struct DisplayPipeline<D> {
    sink: D,
    layout: FrameLayout,
    schedule: BacklightSchedule,
    frame: FrameBuffer,
    backlight: Option<bool>,
}

impl<D: DisplaySink> DisplayPipeline<D> {
    pub fn new(
        sink: D,
        size: Size,
        layout: FrameLayout,
        schedule: BacklightSchedule,
    ) -> Self {
        Self {
            sink,
            layout,
            schedule,
            frame: FrameBuffer::new(size),
            backlight: None,
        }
    }

    /// Render and show one frame for wall-clock `hour`.
    pub fn present(
        &mut self,
        hour: u32,
        readouts: &Readouts,
        columns: &[f32],
    ) -> Presented {
        let lit = self.schedule.is_lit(hour);
        self.switch_backlight(lit);
        if !lit {
            return Presented::Suppressed;
        }

        let domain = self.layout.draw(&mut self.frame, readouts, columns);
        if let Err(e) = self.sink.display(&self.frame) {
            warn!(sink = self.sink.name(), error = %e, "display update failed");
        }
        Presented::Rendered(domain)
    }

    fn switch_backlight(
        &mut self,
        on: bool,
    ) {
        if self.backlight == Some(on) {
            return;
        }
        match self.sink.set_backlight(on) {
            Ok(()) => {
                info!(on, "backlight switched");
                self.backlight = Some(on);
            }
            Err(e) => warn!(sink = self.sink.name(), error = %e, "backlight switch failed"),
        }
    }

    #[cfg(test)]
    pub fn frame(&self) -> &FrameBuffer { &self.frame }

    #[cfg(test)]
    pub fn sink(&self) -> &D { &self.sink }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut D { &mut self.sink }
}

#[cfg(test)]
pub(crate) mod tests {
    use airmon_common::colors::{BLACK, color_for_score};
    use airmon_common::config::{CHART_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
    use airmon_common::thresholds::CO2_BAND;
    use embedded_graphics::prelude::Point;

    use super::*;
    use crate::error::DisplayError;

    /// Display that records every call.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingDisplay {
        pub frames: usize,
        pub backlight_calls: Vec<bool>,
        pub fail_display: bool,
    }

    impl DisplaySink for RecordingDisplay {
        fn name(&self) -> &'static str { "recording" }

        fn display(
            &mut self,
            _frame: &FrameBuffer,
        ) -> Result<(), DisplayError> {
            if self.fail_display {
                return Err(DisplayError::Io(std::io::Error::other("panel unplugged")));
            }
            self.frames += 1;
            Ok(())
        }

        fn set_backlight(
            &mut self,
            on: bool,
        ) -> Result<(), DisplayError> {
            self.backlight_calls.push(on);
            Ok(())
        }
    }

    fn pipeline() -> DisplayPipeline<RecordingDisplay> {
        DisplayPipeline::new(
            RecordingDisplay::default(),
            Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            FrameLayout::default(),
            BacklightSchedule::default(),
        )
    }

    fn readouts(ppm: f32) -> Readouts {
        Readouts {
            co2_ppm: Some(ppm),
            ..Readouts::default()
        }
    }

    #[test]
    fn test_night_suppresses_rendering() {
        let mut p = pipeline();
        assert_eq!(p.present(23, &readouts(900.0), &[500.0, 900.0]), Presented::Suppressed);
        assert_eq!(p.sink().frames, 0);
        assert_eq!(p.sink().backlight_calls, [false]);
        // Frame untouched
        assert!(p.frame().pixels().iter().all(|&px| px == BLACK));
    }

    #[test]
    fn test_day_renders_with_backlight() {
        let mut p = pipeline();
        let presented = p.present(12, &readouts(1000.0), &[500.0, 1000.0]);
        assert!(matches!(presented, Presented::Rendered(Some(_))));
        assert_eq!(p.sink().frames, 1);
        assert_eq!(p.sink().backlight_calls, [true]);
        assert_eq!(p.frame().pixel(Point::new(SCREEN_WIDTH as i32 - 1, 0)), Some(color_for_score(255)));
    }

    #[test]
    fn test_backlight_switched_only_on_change() {
        let mut p = pipeline();
        for hour in [12, 13, 14, 22, 23, 0, 7, 8] {
            p.present(hour, &readouts(700.0), &[]);
        }
        assert_eq!(p.sink().backlight_calls, [true, false, true]);
        assert_eq!(p.sink().frames, 5);
    }

    #[test]
    fn test_display_failure_is_not_fatal() {
        let mut p = pipeline();
        p.sink_mut().fail_display = true;
        let presented = p.present(12, &readouts(700.0), &[]);
        assert_eq!(presented, Presented::Rendered(None));
        assert_eq!(p.sink().frames, 0);
    }

    #[test]
    fn test_chart_uses_layout_band() {
        let mut p = pipeline();
        let presented = p.present(12, &readouts(700.0), &[700.0; 4]);
        assert_eq!(
            presented,
            Presented::Rendered(Some(ChartDomain {
                min: CO2_BAND.low(),
                max: CO2_BAND.high(),
            }))
        );
        assert_eq!(CHART_SIZE.width, SCREEN_WIDTH);
    }
}
