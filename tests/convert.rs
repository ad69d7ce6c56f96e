extern crate icoforge;
extern crate png;
extern crate tempfile;

use icoforge::{
    convert_bytes, convert_file, ConvertOptions, Error, FrameEncoding,
    IconDir, ICONDIRENTRY_LEN, ICONDIR_LEN,
};
use std::fs;
use std::io::Cursor;
use std::path::Path;

//===========================================================================//

#[test]
fn default_sizes_from_large_opaque_png() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("logo.png");
    write_png(&source, 512, 512, |x, y| {
        [(x / 2) as u8, (y / 2) as u8, 90, 255]
    });
    let destination = dir.path().join("app.ico");
    let conversion =
        convert_file(&source, &destination, &ConvertOptions::default())
            .unwrap();
    let sizes: Vec<u32> =
        conversion.sizes.iter().map(|s| s.pixels()).collect();
    assert_eq!(sizes, vec![16, 32, 48, 64, 128, 256]);

    let bytes = fs::read(&destination).unwrap();
    assert_eq!(conversion.bytes_written, bytes.len());
    assert_eq!(&bytes[..6], b"\x00\x00\x01\x00\x06\x00");
    let icondir = IconDir::read(Cursor::new(&bytes)).unwrap();
    let payloads: usize =
        icondir.entries().iter().map(|entry| entry.data().len()).sum();
    let directory_len = (ICONDIR_LEN + 6 * ICONDIRENTRY_LEN) as usize;
    assert_eq!(bytes.len(), directory_len + payloads);
    for (entry, &size) in icondir.entries().iter().zip(sizes.iter()) {
        assert!(entry.is_png());
        assert_eq!(entry.bits_per_pixel(), 32);
        let image = entry.decode().unwrap();
        assert_eq!((image.width(), image.height()), (size, size));
        assert!(image.is_opaque());
    }
}

#[test]
fn entries_are_contiguous_and_end_at_eof() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("logo.png");
    write_png(&source, 40, 40, |x, y| [x as u8 * 6, y as u8 * 6, 0, 200]);
    let destination = dir.path().join("app.ico");
    let options = ConvertOptions::default()
        .with_sizes(vec![1, 17, 48, 255, 256])
        .unwrap();
    convert_file(&source, &destination, &options).unwrap();

    let bytes = fs::read(&destination).unwrap();
    let icondir = IconDir::read(Cursor::new(&bytes)).unwrap();
    assert_eq!(icondir.entries().len(), 5);
    let mut expected_offset = (ICONDIR_LEN + 5 * ICONDIRENTRY_LEN) as u32;
    for entry in icondir.entries() {
        assert_eq!(entry.data_offset(), expected_offset);
        expected_offset += entry.data().len() as u32;
    }
    assert_eq!(expected_offset as usize, bytes.len());

    let stored: Vec<(u8, u8)> = icondir
        .entries()
        .iter()
        .map(|entry| entry.directory_bytes())
        .collect();
    assert_eq!(stored, vec![(1, 1), (17, 17), (48, 48), (255, 255), (0, 0)]);
    assert_eq!(icondir.entries()[4].width(), 256);
}

#[test]
fn out_of_range_sizes_are_rejected() {
    for &size in &[0, -1, 257, 512] {
        match ConvertOptions::default().with_sizes(vec![16, size]) {
            Err(Error::InvalidSize { size: bad }) => assert_eq!(bad, size),
            other => panic!("Expected InvalidSize, got {:?}", other),
        }
    }
}

#[test]
fn missing_source_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("nope.png");
    let destination = dir.path().join("out").join("app.ico");
    match convert_file(&source, &destination, &ConvertOptions::default()) {
        Err(Error::InputNotFound { path }) => assert_eq!(path, source),
        other => panic!("Expected InputNotFound, got {:?}", other),
    }
    assert!(!destination.exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn decode_failure_keeps_existing_destination() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.png");
    fs::write(&source, b"\x89PNG\r\n\x1a\nnot really a png").unwrap();
    let destination = dir.path().join("app.ico");
    fs::write(&destination, b"previous icon").unwrap();
    let options = ConvertOptions::default();
    let result = convert_file(&source, &destination, &options);
    match result {
        Err(error) => assert_eq!(error.stage(), "decode"),
        Ok(_) => panic!("Expected a decode error"),
    }
    assert_eq!(fs::read(&destination).unwrap(), b"previous icon");
}

#[test]
fn duplicate_sizes_keep_first_occurrence() {
    let data = png_bytes(64, 64, |_, _| [10, 20, 30, 255]);
    let options =
        ConvertOptions::default().with_sizes(vec![32, 16, 32]).unwrap();
    let bytes = convert_bytes(&data, &options).unwrap();
    let icondir = IconDir::read(Cursor::new(bytes)).unwrap();
    let widths: Vec<u32> =
        icondir.entries().iter().map(|entry| entry.width()).collect();
    assert_eq!(widths, vec![32, 16]);
}

#[test]
fn bmp_frames_round_trip() {
    let data = png_bytes(32, 32, |x, _| {
        if x < 16 {
            [255, 0, 0, 255]
        } else {
            [0, 0, 255, 0]
        }
    });
    let options = ConvertOptions::default()
        .with_sizes(vec![32])
        .unwrap()
        .with_encoding(FrameEncoding::Bmp);
    let bytes = convert_bytes(&data, &options).unwrap();
    let icondir = IconDir::read(Cursor::new(bytes)).unwrap();
    let entry = &icondir.entries()[0];
    assert!(!entry.is_png());
    assert_eq!(entry.bits_per_pixel(), 32);
    // Same size, so the pixels are copied through unchanged.
    let image = entry.decode().unwrap();
    assert_eq!(image.pixel(3, 7), [255, 0, 0, 255]);
    assert_eq!(image.pixel(20, 7), [0, 0, 255, 0]);
}

#[test]
fn non_square_source_is_stretched() {
    let data = png_bytes(80, 20, |_, _| [0, 128, 0, 255]);
    let options = ConvertOptions::default().with_sizes(vec![16, 48]).unwrap();
    let bytes = convert_bytes(&data, &options).unwrap();
    let icondir = IconDir::read(Cursor::new(bytes)).unwrap();
    for entry in icondir.entries() {
        let image = entry.decode().unwrap();
        assert_eq!(image.width(), image.height());
        assert_eq!(image.pixel(0, 0), [0, 128, 0, 255]);
    }
}

#[test]
fn file_output_matches_in_memory_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("logo.png");
    write_png(&source, 50, 50, |x, y| [x as u8 * 5, 0, y as u8 * 5, 255]);
    let destination = dir.path().join("nested").join("app.ico");
    let options = ConvertOptions::default()
        .with_sizes(vec![48, 24])
        .unwrap()
        .with_parallel(false);
    let conversion = convert_file(&source, &destination, &options).unwrap();
    let expected =
        convert_bytes(&fs::read(&source).unwrap(), &options).unwrap();
    assert_eq!(fs::read(&destination).unwrap(), expected);
    assert_eq!(conversion.bytes_written, expected.len());
    let sizes: Vec<String> =
        conversion.sizes.iter().map(|size| size.to_string()).collect();
    assert_eq!(sizes, vec!["48x48", "24x24"]);
}

//===========================================================================//

fn png_bytes<F>(width: u32, height: u32, color: F) -> Vec<u8>
where
    F: Fn(u32, u32) -> [u8; 4],
{
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&color(x, y));
        }
    }
    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&rgba).unwrap();
        writer.finish().unwrap();
    }
    output
}

fn write_png<F>(path: &Path, width: u32, height: u32, color: F)
where
    F: Fn(u32, u32) -> [u8; 4],
{
    fs::write(path, png_bytes(width, height, color)).unwrap();
}

//===========================================================================//
