pub mod image;
pub mod report;
