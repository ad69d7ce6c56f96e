extern crate icoforge;

use icoforge::{
    Error, FrameEncoding, IconContainer, IconDir, IconFrame, PixelBuffer,
};
use std::io::Cursor;

//===========================================================================//

#[test]
fn encode_opaque_png_frame_keeps_alpha() {
    // Even an image with no transparency is stored as RGBA, so that every
    // frame is 32 bpp.
    let mut rgba = Vec::<u8>::new();
    for index in 0..(24 * 24) {
        let color = [(index % 100) as u8, ((index / 100) % 5) as u8, 0, 0xff];
        rgba.extend_from_slice(&color);
    }
    let image = PixelBuffer::from_rgba_data(24, 24, rgba.clone());
    let frame = IconFrame::encode(&image, FrameEncoding::Png).unwrap();
    assert_eq!(frame.bits_per_pixel(), 32);
    let entry = read_single_entry(frame);
    assert!(entry.is_png());
    assert_eq!(entry.bits_per_pixel(), 32);
    assert_eq!(entry.decode().unwrap().rgba_data(), rgba.as_slice());
}

#[test]
fn encode_png_frame_with_alpha_channel() {
    let mut rgba = Vec::<u8>::new();
    for index in 0..(24 * 24) {
        let color = [(index % 100) as u8, 0, 0, 1 + (index / 100) as u8];
        rgba.extend_from_slice(&color);
    }
    let image = PixelBuffer::from_rgba_data(24, 24, rgba.clone());
    let frame = IconFrame::encode(&image, FrameEncoding::Png).unwrap();
    let entry = read_single_entry(frame);
    assert!(entry.is_png());
    assert_eq!(entry.decode().unwrap().rgba_data(), rgba.as_slice());
}

#[test]
fn encode_bmp_frame_with_nonbinary_alpha() {
    let rgba: &[u8] = b"\xff\x00\x00\x7f\x00\xff\x00\x7f\
                        \xff\x00\x00\x7f\xff\x00\x00\x00";
    let image = PixelBuffer::from_rgba_data(2, 2, rgba.to_vec());
    let frame = IconFrame::encode(&image, FrameEncoding::Bmp).unwrap();
    let entry = read_single_entry(frame);
    assert!(!entry.is_png());
    assert_eq!(entry.bits_per_pixel(), 32);
    assert_eq!(entry.decode().unwrap().rgba_data(), rgba);
}

#[test]
fn encode_odd_width_bmp_frame() {
    // 13 pixels per row need a padded two-byte mask row.
    let mut rgba = Vec::<u8>::new();
    for index in 0..(13 * 13) {
        let alpha = if index % 3 == 0 { 0 } else { 0xff };
        rgba.extend_from_slice(&[(index % 10) as u8, 7, 9, alpha]);
    }
    let image = PixelBuffer::from_rgba_data(13, 13, rgba.clone());
    let frame = IconFrame::encode(&image, FrameEncoding::Bmp).unwrap();
    assert_eq!(frame.data().len(), 40 + 13 * (13 * 4 + 4));
    let entry = read_single_entry(frame);
    assert_eq!(entry.decode().unwrap().rgba_data(), rgba.as_slice());
}

#[test]
fn encode_rejects_non_square_and_oversized_buffers() {
    let wide = PixelBuffer::filled(32, 16, [0, 0, 0, 255]);
    assert!(matches!(
        IconFrame::encode(&wide, FrameEncoding::Png),
        Err(Error::Encode(_))
    ));
    let huge = PixelBuffer::filled(300, 300, [0, 0, 0, 255]);
    assert!(matches!(
        IconFrame::encode(&huge, FrameEncoding::Bmp),
        Err(Error::Encode(_))
    ));
}

//===========================================================================//

fn read_single_entry(frame: IconFrame) -> icoforge::IconDirEntry {
    let container = IconContainer::new(vec![frame]).unwrap();
    let bytes = container.to_bytes().unwrap();
    let icondir = IconDir::read(Cursor::new(bytes)).unwrap();
    assert_eq!(icondir.entries().len(), 1);
    icondir.entries()[0].clone()
}

//===========================================================================//
