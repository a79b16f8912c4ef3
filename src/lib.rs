#![doc = r#"
justcrop: batch face cropping and denoising for folders of photos.

The crate powers two command line tools, `justcrop` and `denoise`, and can
be embedded directly.

`justcrop` finds the most prominent face in every image, cuts a rectangle
around it that keeps the requested output aspect ratio and face size, fits
it into the output frame and fills the border (`replicate`, `reflect`,
`average` or `inpaint`). `denoise` runs a colored non-local means filter
over every image.

Both share one batch driver: unreadable images and images without a usable
result are counted as rejected and never stop the run.

Face model
----------
Detection uses the SeetaFace frontal model `seeta_fd_frontal_v1.0.bin`
distributed with the `rustface` project
(<https://github.com/atomashpolskiy/rustface>, under `model/`). It is not
bundled. When no `--model` is given, the path comes from `JUSTCROP_MODEL`,
then `model/seeta_fd_frontal_v1.0.bin` next to the executable, then the same
path in the working directory.

Quick start: crop a folder
--------------------------
```rust,no_run
use std::path::Path;
use justcrop::{BorderMode, CropParams, crop_directory};

fn main() -> justcrop::Result<()> {
    let params = CropParams {
        width: 400,
        height: 600,
        border: BorderMode::Inpaint,
        ..CropParams::default()
    };

    let report = crop_directory(
        Path::new("/photos"),
        Some(Path::new("/photos/cropped")),
        Some(Path::new("/photos/rejected")),
        &params,
    )?;
    println!("{}", report.summary("faces cropped"));
    Ok(())
}
```

Custom face detector
--------------------
Anything implementing [`FaceDetector`] can drive the crop pipeline:

```rust
use image::{GrayImage, Rgb, RgbImage};
use justcrop::{CropParams, CropOutcome, FaceBox, FaceDetector, crop_face};

struct Centered;

impl FaceDetector for Centered {
    fn detect(&mut self, gray: &GrayImage) -> Vec<FaceBox> {
        let (w, h) = gray.dimensions();
        vec![FaceBox::new(w as f64 / 2.0 - 20.0, h as f64 / 2.0 - 20.0, 40.0, 40.0)]
    }
}

let image = RgbImage::from_pixel(200, 200, Rgb([120, 100, 90]));
let params = CropParams { width: 100, height: 120, ..CropParams::default() };
match crop_face(&image, &mut Centered, &params).unwrap() {
    CropOutcome::Cropped(out) => assert_eq!(out.dimensions(), (100, 120)),
    other => panic!("unexpected {:?}", other),
}
```

Modules
-------
- `api`: batch driver, transforms and reports
- `core`: parameters and processing (crop geometry, resize, border fill, inpainting, color, denoising)
- `detect`: face detection seam and the SeetaFace backend
- `io`: input listing, decoding and writers
- `cli`: argument parsing and runners shared by both binaries
"#]
pub mod api;
pub mod cli;
pub mod core;
pub mod detect;
pub mod error;
pub mod io;
pub mod types;

pub use api::{
    BatchReport, BatchTransform, CropTransform, DenoiseTransform, RejectedFile, crop_directory,
    denoise_directory, process_directory,
};
pub use core::params::{CropParams, DenoiseParams, PadWeights};
pub use core::processing::border::fill_border;
pub use core::processing::denoise::denoise_colored;
pub use core::processing::geometry::{CropGeometry, CropRect, FaceBox, crop_positions};
pub use core::processing::pipeline::{CropOutcome, crop_face};
pub use detect::{FaceDetector, SeetaDetector};
pub use error::{Error, Result};
pub use types::{BorderMode, Rejection};
