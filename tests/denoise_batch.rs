use std::fs;

use image::{Rgb, RgbImage};
use justcrop::{DenoiseParams, DenoiseTransform, Error, process_directory};

fn noisy(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        let n = ((x * 7 + y * 13) % 5) as u8 * 4;
        Rgb([100 + n, 120 + n, 140 + n])
    })
}

#[test]
fn denoises_readable_images_and_rejects_the_rest() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    noisy(24, 18).save(input.path().join("one.png")).unwrap();
    noisy(16, 16).save(input.path().join("two.bmp")).unwrap();
    fs::write(input.path().join("three.tif"), b"truncated").unwrap();

    let mut transform = DenoiseTransform::new(DenoiseParams::with_lum(10.0)).unwrap();
    let report =
        process_directory(input.path(), Some(output.path()), None, &mut transform).unwrap();

    assert_eq!((report.input, report.processed, report.rejected), (3, 2, 1));
    assert_eq!(
        report.summary("images denoised"),
        "3 input files, 2 images denoised, 1 rejected"
    );

    let out = image::open(output.path().join("one.png")).unwrap().to_rgb8();
    assert_eq!(out.dimensions(), (24, 18));
    // the periodic pattern is flattened towards its mean
    let spread = |img: &RgbImage| {
        let values: Vec<i32> = img.pixels().map(|p| p[0] as i32).collect();
        values.iter().max().unwrap() - values.iter().min().unwrap()
    };
    assert!(spread(&out) < spread(&noisy(24, 18)));
    assert!(output.path().join("two.bmp").exists());
}

#[test]
fn output_folder_holds_only_processed_images() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    noisy(12, 12).save(input.path().join("good.png")).unwrap();
    fs::write(input.path().join("bad.tif"), b"garbage").unwrap();

    let mut transform = DenoiseTransform::new(DenoiseParams::default()).unwrap();
    let report =
        process_directory(input.path(), Some(output.path()), None, &mut transform).unwrap();

    let mut names: Vec<String> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), report.processed);
    assert_eq!(names, vec!["good.png"]);
    // the rejected original stays where it was
    assert!(input.path().join("bad.tif").exists());
}

#[test]
fn directory_without_images_is_an_error() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("readme.md"), b"hello").unwrap();
    let mut transform = DenoiseTransform::new(DenoiseParams::default()).unwrap();
    let err = process_directory(input.path(), None, None, &mut transform).unwrap_err();
    assert!(matches!(err, Error::NoInputImages { .. }));
}
