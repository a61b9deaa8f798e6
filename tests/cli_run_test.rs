// Filesystem runs through the command-line entry
use std::fs;
use std::io::Cursor;

use clap::Parser;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use logo_pack::asset_pack::ImageError;
use logo_pack::cli::Cli;
use logo_pack::error::AppError;
use tempfile::tempdir;

fn logo_png() -> Vec<u8> {
    let img = RgbImage::from_fn(120, 80, |x, _| {
        if x < 60 { Rgb([255, 255, 255]) } else { Rgb([180, 20, 20]) }
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

#[test]
fn run_discovers_input_and_writes_tree() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("brand.png"), logo_png()).unwrap();
    let out = dir.path().join("pack");

    let cli = Cli::try_parse_from([
        "logo-pack",
        "--dir",
        dir.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ])
    .unwrap();
    let pack = cli.run().expect("run should succeed");

    assert!(out.join("source/original_brand.png").is_file());
    assert!(out.join("web/favicon.ico").is_file());
    assert!(out.join("android/mipmap-mdpi/ic_launcher.png").is_file());
    assert!(out.join("print/logo.pdf").is_file());
    assert!(out.join("README.md").is_file());
    for asset in &pack.assets {
        assert!(out.join(&asset.path).is_file(), "missing {}", asset.path);
    }
}

#[test]
fn run_without_input_reports_not_found_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("pack");

    let cli = Cli::try_parse_from([
        "logo-pack",
        "--dir",
        dir.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ])
    .unwrap();

    assert!(matches!(cli.run(), Err(AppError::Image(ImageError::NotFound(_)))));
    assert!(!out.exists());
}

#[test]
fn corrupt_input_reports_decode_error_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut bytes = vec![137, 80, 78, 71, 13, 10, 26, 10];
    bytes.extend_from_slice(b"this is not a real png body");
    fs::write(dir.path().join("logo_input.png"), bytes).unwrap();
    let out = dir.path().join("pack");

    let cli = Cli::try_parse_from([
        "logo-pack",
        "--dir",
        dir.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ])
    .unwrap();

    assert!(matches!(cli.run(), Err(AppError::Image(ImageError::Decode(_)))));
    assert!(!out.exists());
}

#[test]
fn settings_file_in_input_dir_is_applied() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("logo_input.png"), logo_png()).unwrap();
    fs::write(
        dir.path().join("logo_pack.json"),
        r#"{"manifest": {"name": "Acme", "short_name": "Acme"}, "parallel": false}"#,
    )
    .unwrap();
    let out = dir.path().join("pack");

    let cli = Cli::try_parse_from([
        "logo-pack",
        "--dir",
        dir.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ])
    .unwrap();
    let pack = cli.run().expect("run should succeed");

    assert_eq!(pack.manifest.name, "Acme");
    let manifest = fs::read_to_string(out.join("web/site.webmanifest")).unwrap();
    assert!(manifest.contains("\"Acme\""));
}
