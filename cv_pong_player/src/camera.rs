// THEORY:
// `OpenCvCamera` adapts a live `VideoCapture` to the core's `FrameSource`.
// OpenCV hands out BGR `Mat`s; the game speaks RGB `image` buffers. The
// conversion happens here, once per frame, and every OpenCV failure is reported
// as a lost frame source so the session can end cleanly.

use cv_pong::{FrameSource, PongError, Result, RgbFrame};
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{info, warn};

pub struct OpenCvCamera {
    capture: VideoCapture,
}

fn acquisition(err: opencv::Error) -> PongError {
    PongError::Acquisition(err.to_string())
}

impl OpenCvCamera {
    pub fn open(index: i32, fps: f64) -> Result<Self> {
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(acquisition)?;
        if !capture.is_opened().map_err(acquisition)? {
            return Err(PongError::Acquisition(format!("camera {index} could not be opened")));
        }
        // Not every backend honors a frame rate request.
        match capture.set(videoio::CAP_PROP_FPS, fps) {
            Ok(true) => {}
            Ok(false) => warn!(fps, "camera ignored the frame rate request"),
            Err(err) => warn!(error = %err, "could not set camera frame rate"),
        }
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH).map_err(acquisition)?;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT).map_err(acquisition)?;
        info!(index, width, height, fps, "camera opened");
        Ok(Self { capture })
    }
}

impl FrameSource for OpenCvCamera {
    fn next_frame(&mut self) -> Result<RgbFrame> {
        let mut bgr = Mat::default();
        if !self.capture.read(&mut bgr).map_err(acquisition)? {
            return Err(PongError::Acquisition("camera stopped delivering frames".into()));
        }
        if bgr.empty() {
            return Err(PongError::EmptyFrame);
        }
        let mut rgb = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0).map_err(acquisition)?;
        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let data = rgb.data_bytes().map_err(acquisition)?.to_vec();
        RgbFrame::from_raw(width, height, data)
            .ok_or_else(|| PongError::Acquisition("camera frame has an unexpected layout".into()))
    }
}
