//! I/O layer: listing and decoding input images, and the `writers` for
//! encoded outputs and JSON batch reports.
pub mod reader;
pub use reader::{list_input_images, load_rgb_image};

pub mod writers;
