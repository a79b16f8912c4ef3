pub mod array;
pub mod border;
pub mod color;
pub mod denoise;
pub mod geometry;
pub mod inpaint;
pub mod pipeline;
pub mod resize;
