// THEORY:
// Before a color game starts, the players tune the HSV window with six sliders
// while watching the resulting mask live. The mask is built by the same
// `ColorTracker` the game uses, so what the sliders show is exactly what the
// paddles will follow. Any key ends tuning and the slider positions become the
// game's range.

use crate::display::{display_error, mask_to_mat};
use cv_pong::core_modules::color_tracker::{
    ColorTracker, HUE_MAX, HsvRange, SATURATION_MAX, VALUE_MAX,
};
use cv_pong::core_modules::preprocess;
use cv_pong::{BoardConfig, FrameSource, Result, RgbFrame};
use opencv::highgui;
use tracing::{info, warn};

const SETTINGS_WINDOW: &str = "Settings";
const MASK_WINDOW: &str = "Threshold";
const POLL_DELAY_MS: i32 = 30;

/// Slider name and maximum, in `HsvRange::to_array` order.
const SLIDERS: [(&str, u8); 6] = [
    ("LowH", HUE_MAX),
    ("HighH", HUE_MAX),
    ("LowS", SATURATION_MAX),
    ("HighS", SATURATION_MAX),
    ("LowV", VALUE_MAX),
    ("HighV", VALUE_MAX),
];

fn read_sliders() -> Result<HsvRange> {
    let mut bounds = [0u8; 6];
    for (slot, (name, max)) in bounds.iter_mut().zip(SLIDERS) {
        let pos = highgui::get_trackbar_pos(name, SETTINGS_WINDOW).map_err(display_error)?;
        *slot = pos.clamp(0, max as i32) as u8;
    }
    HsvRange::from_array(bounds)
}

/// Next frame to preview, or `None` when this one is unusable.
fn tuning_frame<S: FrameSource>(source: &mut S) -> Result<Option<RgbFrame>> {
    match source.next_frame() {
        Ok(frame) => Ok(Some(frame)),
        Err(err) if err.is_skippable() => {
            warn!(error = %err, "skipping frame while tuning");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Shows the live mask for `initial` and returns the range the sliders end on.
pub fn tune_hsv<S: FrameSource>(
    source: &mut S,
    initial: HsvRange,
    config: &BoardConfig,
) -> Result<HsvRange> {
    highgui::named_window(SETTINGS_WINDOW, highgui::WINDOW_AUTOSIZE).map_err(display_error)?;
    highgui::named_window(MASK_WINDOW, highgui::WINDOW_AUTOSIZE).map_err(display_error)?;
    for ((name, max), value) in SLIDERS.into_iter().zip(initial.to_array()) {
        highgui::create_trackbar(name, SETTINGS_WINDOW, None, max as i32, None)
            .map_err(display_error)?;
        highgui::set_trackbar_pos(name, SETTINGS_WINDOW, value as i32).map_err(display_error)?;
    }
    info!("adjust the sliders, then press any key to start");

    // The event loop is pumped on every pass, including passes without a frame.
    let range = loop {
        let range = read_sliders()?;
        if let Some(mut frame) = tuning_frame(source)? {
            preprocess::mirror(&mut frame);
            let mask = ColorTracker::new(range, config.color_area_threshold).build_mask(&frame);
            highgui::imshow(MASK_WINDOW, &mask_to_mat(&mask)?).map_err(display_error)?;
        }
        if highgui::wait_key(POLL_DELAY_MS).map_err(display_error)? >= 0 {
            break range;
        }
    };

    highgui::destroy_window(SETTINGS_WINDOW).map_err(display_error)?;
    highgui::destroy_window(MASK_WINDOW).map_err(display_error)?;
    info!(?range, "color range selected");
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_pong::PongError;
    use std::collections::VecDeque;

    struct Frames(VecDeque<Result<RgbFrame>>);

    impl FrameSource for Frames {
        fn next_frame(&mut self) -> Result<RgbFrame> {
            self.0
                .pop_front()
                .unwrap_or_else(|| Err(PongError::Acquisition("out of frames".into())))
        }
    }

    #[test]
    fn unusable_frames_yield_nothing_to_preview() {
        let mut source = Frames(VecDeque::from(vec![
            Err(PongError::EmptyFrame),
            Ok(RgbFrame::new(4, 4)),
        ]));
        assert!(tuning_frame(&mut source).unwrap().is_none());
        assert!(tuning_frame(&mut source).unwrap().is_some());
        assert!(matches!(
            tuning_frame(&mut source),
            Err(PongError::Acquisition(_))
        ));
    }
}
