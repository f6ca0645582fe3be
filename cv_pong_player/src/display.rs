// THEORY:
// `HighGuiDisplay` is the `DisplaySink` the player shows the game in. It turns
// the rendered RGB board back into a BGR `Mat`, draws the caption with a
// Hershey font (the core has no text rendering of its own) and pumps the
// HighGUI event loop. Esc asks the session to quit.

use cv_pong::{DisplaySink, Mask, PongError, RenderedFrame, Result, RgbFrame, SinkControl};
use image::Rgb;
use opencv::{
    core::{Mat, Point, Scalar},
    highgui, imgproc,
    prelude::*,
};

pub const GAME_WINDOW: &str = "cvpong";
pub const ESCAPE_KEY: i32 = 27;

const CAPTION_FONT_SCALE: f64 = 1.5;
const CAPTION_THICKNESS: i32 = 1;

pub fn display_error(err: opencv::Error) -> PongError {
    PongError::Display(err.to_string())
}

/// Copies an RGB frame into a new BGR `Mat`.
pub fn rgb_to_mat(frame: &RgbFrame) -> Result<Mat> {
    let flat = Mat::from_slice(frame.as_raw().as_slice()).map_err(display_error)?;
    let rgb = flat.reshape(3, frame.height() as i32).map_err(display_error)?;
    let mut bgr = Mat::default();
    imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0).map_err(display_error)?;
    Ok(bgr)
}

/// Copies a single-channel mask into a new `Mat`.
pub fn mask_to_mat(mask: &Mask) -> Result<Mat> {
    let flat = Mat::from_slice(mask.as_raw().as_slice()).map_err(display_error)?;
    let gray = flat.reshape(1, mask.height() as i32).map_err(display_error)?;
    gray.try_clone().map_err(display_error)
}

fn scalar(color: Rgb<u8>) -> Scalar {
    let [r, g, b] = color.0;
    Scalar::new(b as f64, g as f64, r as f64, 0.0)
}

pub struct HighGuiDisplay {
    window: &'static str,
}

impl HighGuiDisplay {
    pub fn open() -> Result<Self> {
        highgui::named_window(GAME_WINDOW, highgui::WINDOW_AUTOSIZE).map_err(display_error)?;
        Ok(Self { window: GAME_WINDOW })
    }

    /// Keeps the last frame on screen until any key is pressed.
    pub fn hold(&self) -> Result<()> {
        highgui::wait_key(0).map_err(display_error)?;
        Ok(())
    }

    pub fn close(&self) -> Result<()> {
        highgui::destroy_all_windows().map_err(display_error)
    }
}

impl DisplaySink for HighGuiDisplay {
    fn present(&mut self, frame: &RenderedFrame) -> Result<SinkControl> {
        let mut board = rgb_to_mat(&frame.image)?;
        let caption = &frame.caption;
        imgproc::put_text(
            &mut board,
            &caption.text,
            Point::new(caption.origin.0, caption.origin.1),
            imgproc::FONT_HERSHEY_COMPLEX_SMALL,
            CAPTION_FONT_SCALE,
            scalar(caption.color),
            CAPTION_THICKNESS,
            imgproc::LINE_AA,
            false,
        )
        .map_err(display_error)?;
        highgui::imshow(self.window, &board).map_err(display_error)?;

        match highgui::wait_key(1).map_err(display_error)? {
            ESCAPE_KEY => Ok(SinkControl::Quit),
            _ => Ok(SinkControl::Continue),
        }
    }
}
