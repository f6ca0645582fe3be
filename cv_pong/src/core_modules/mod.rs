pub mod blob_detector;
pub mod color_tracker;
pub mod draw;
pub mod frame;
pub mod game_board;
pub mod moment;
pub mod motion_tracker;
pub mod paddle_detector;
pub mod preprocess;
pub mod settings;
pub mod smart_blob;
