//! End-to-end batch runs against real image fixtures in temp directories.

use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use webp_batch::{
    run, run_with, BatchResult, CancelToken, ConversionOptions, FnSink, NullSink, ProgressEvent,
    WebpCodec,
};

fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 128]));
    img.save(&path).unwrap();
    path
}

fn run_collecting(
    input: &Path,
    options: &ConversionOptions,
) -> (BatchResult, Vec<ProgressEvent>) {
    let mut events = Vec::new();
    let mut sink = FnSink(|e: &ProgressEvent| events.push(e.clone()));
    let result = run(input, options, &mut sink).unwrap();
    (result, events)
}

#[test]
fn flat_directory_counts_eligible_files_only() {
    let tmp = TempDir::new().unwrap();
    write_png(tmp.path(), "a.png");
    write_png(tmp.path(), "b.png");
    write_png(tmp.path(), "sub/c.png");
    fs::write(tmp.path().join("notes.txt"), b"not an image").unwrap();

    let (result, events) = run_collecting(tmp.path(), &ConversionOptions::default());

    assert_eq!(result.total, 2);
    assert_eq!(result.converted, 2);
    assert_eq!(result.converted + result.skipped + result.failed, result.total);
    assert_eq!(events.len(), 3);
    assert!(tmp.path().join("a.webp").exists());
    assert!(tmp.path().join("b.webp").exists());
    assert!(!tmp.path().join("sub/c.webp").exists());
}

#[test]
fn recursive_run_mirrors_subdirectories_under_output_root() {
    let tmp = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_png(tmp.path(), "top.png");
    write_png(tmp.path(), "sub/img.png");
    write_png(tmp.path(), "sub/deeper/leaf.png");

    let options = ConversionOptions {
        recursive: true,
        output_root: Some(out.path().to_path_buf()),
        ..ConversionOptions::default()
    };
    let (result, _) = run_collecting(tmp.path(), &options);

    assert_eq!(result.converted, 3);
    assert!(out.path().join("top.webp").exists());
    assert!(out.path().join("sub/img.webp").exists());
    assert!(out.path().join("sub/deeper/leaf.webp").exists());
}

#[test]
fn non_recursive_run_with_output_root_stays_flat() {
    let tmp = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_png(tmp.path(), "a.png");
    write_png(tmp.path(), "sub/b.png");

    let options = ConversionOptions {
        output_root: Some(out.path().to_path_buf()),
        ..ConversionOptions::default()
    };
    let (result, _) = run_collecting(tmp.path(), &options);

    assert_eq!(result.total, 1);
    assert!(out.path().join("a.webp").exists());
    assert!(!out.path().join("sub").exists());
}

#[test]
fn single_file_input_lands_beside_the_source() {
    let tmp = TempDir::new().unwrap();
    let source = write_png(tmp.path(), "sub/photo.png");

    let (result, events) = run_collecting(&source, &ConversionOptions::default());

    assert_eq!(result.total, 1);
    assert_eq!(result.converted, 1);
    assert!(tmp.path().join("sub/photo.webp").exists());
    assert_eq!(events.last().unwrap().current, 1);
}

#[test]
fn second_run_without_overwrite_skips_everything_byte_identically() {
    let tmp = TempDir::new().unwrap();
    write_png(tmp.path(), "a.png");
    write_png(tmp.path(), "b.png");

    let options = ConversionOptions {
        overwrite_existing: false,
        ..ConversionOptions::default()
    };

    let (first, _) = run_collecting(tmp.path(), &options);
    assert_eq!(first.converted, 2);

    let before: Vec<Vec<u8>> = ["a.webp", "b.webp"]
        .iter()
        .map(|n| fs::read(tmp.path().join(n)).unwrap())
        .collect();

    let (second, _) = run_collecting(tmp.path(), &options);
    assert_eq!(second.skipped, second.total);
    assert_eq!(second.converted, 0);

    let after: Vec<Vec<u8>> = ["a.webp", "b.webp"]
        .iter()
        .map(|n| fs::read(tmp.path().join(n)).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn overwrite_replaces_whatever_was_at_the_destination() {
    let tmp = TempDir::new().unwrap();
    write_png(tmp.path(), "a.png");
    fs::write(tmp.path().join("a.webp"), b"stale placeholder").unwrap();

    let (result, _) = run_collecting(tmp.path(), &ConversionOptions::default());

    assert_eq!(result.converted, 1);
    let bytes = fs::read(tmp.path().join("a.webp")).unwrap();
    assert_eq!(&bytes[8..12], b"WEBP");
}

#[test]
fn one_corrupt_file_does_not_abort_the_batch() {
    let tmp = TempDir::new().unwrap();
    write_png(tmp.path(), "good1.png");
    write_png(tmp.path(), "good2.png");
    fs::write(tmp.path().join("broken.png"), b"garbage, not a png").unwrap();

    let (result, events) = run_collecting(tmp.path(), &ConversionOptions::default());

    assert_eq!(result.total, 3);
    assert_eq!(result.converted, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].0.ends_with("broken.png"));
    assert!(result.is_complete());

    let last = events.last().unwrap();
    assert!(last.message.contains("2 converted"));
    assert!(last.message.contains("1 failed"));
}

#[test]
fn quality_extremes_and_lossless_all_convert() {
    for options in [
        ConversionOptions {
            quality: 0,
            ..ConversionOptions::default()
        },
        ConversionOptions {
            quality: 100,
            ..ConversionOptions::default()
        },
        ConversionOptions {
            lossless: true,
            ..ConversionOptions::default()
        },
    ] {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "a.png");
        let (result, _) = run_collecting(tmp.path(), &options);
        assert_eq!(result.converted, 1);
    }
}

#[test]
fn parallel_run_matches_sequential_counts() {
    let tmp = TempDir::new().unwrap();
    for i in 0..6 {
        write_png(tmp.path(), &format!("img{i}.png"));
    }
    fs::write(tmp.path().join("bad.png"), b"nope").unwrap();

    let sequential = {
        let out = TempDir::new().unwrap();
        let options = ConversionOptions {
            output_root: Some(out.path().to_path_buf()),
            ..ConversionOptions::default()
        };
        run_collecting(tmp.path(), &options).0
    };

    let parallel = {
        let out = TempDir::new().unwrap();
        let options = ConversionOptions {
            output_root: Some(out.path().to_path_buf()),
            jobs: 4,
            ..ConversionOptions::default()
        };
        run_collecting(tmp.path(), &options).0
    };

    assert_eq!(sequential.total, parallel.total);
    assert_eq!(sequential.converted, parallel.converted);
    assert_eq!(sequential.failed, parallel.failed);
    assert!(parallel.is_complete());
}

#[test]
fn absent_sink_still_produces_the_same_result() {
    let tmp = TempDir::new().unwrap();
    write_png(tmp.path(), "a.png");
    write_png(tmp.path(), "b.png");

    let result = run_with(
        &WebpCodec,
        tmp.path(),
        &ConversionOptions::default(),
        &mut NullSink,
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(result.converted, 2);
    assert!(result.is_complete());
}
