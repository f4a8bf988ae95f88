mod common;

use common::{BmpBuilder, CountingSource};
use enough::Unstoppable;
use zenbmp::*;

fn decode_err(file: &[u8]) -> BitmapError {
    decode_bmp(file, Unstoppable).unwrap_err()
}

#[test]
fn unknown_dib_length_is_rejected_before_palette() {
    let file = BmpBuilder::new(2, 2, 8)
        .dib_len(44)
        .palette(&[[1, 2, 3]; 4])
        .data(&[0; 8])
        .build();
    let mut src = CountingSource::new(&file);
    let err = decode_bmp_from(&mut src, None, Unstoppable).unwrap_err();
    assert!(err.is_unsupported(), "{err:?}");
    // file header plus the DIB length field, nothing more
    assert_eq!(src.consumed, 18);
}

#[test]
fn wrong_data_offset_is_unsupported() {
    let file = BmpBuilder::new(1, 1, 24).offset(60).data(&[0; 4]).build();
    assert!(decode_err(&file).is_unsupported());

    let file = BmpBuilder::new(1, 1, 8)
        .palette(&[[0, 0, 0], [9, 9, 9]])
        .offset(54 + 4)
        .data(&[0; 4])
        .build();
    assert!(decode_err(&file).is_unsupported());
}

#[test]
fn rle_delta_outside_image_is_malformed() {
    let stream = [0, 2, 0, 5, 1, 1, 0, 1];
    let file = BmpBuilder::new(4, 4, 8)
        .compression(1)
        .palette(&[[0, 0, 0], [255, 0, 0]])
        .data(&stream)
        .build();
    let err = decode_err(&file);
    assert!(err.is_malformed(), "{err:?}");
}

#[test]
fn rle_with_wrong_depth_or_top_down_is_unsupported() {
    let rle8_at_4 = BmpBuilder::new(2, 2, 4).compression(1).data(&[0, 1]).build();
    assert!(decode_err(&rle8_at_4).is_unsupported());

    let top_down = BmpBuilder::new(2, -2, 8).compression(1).data(&[0, 1]).build();
    assert!(decode_err(&top_down).is_unsupported());
}

#[test]
fn xrgb_bitfields_force_opaque_alpha() {
    let file = BmpBuilder::new(2, 1, 32)
        .masks([0x00FF_0000, 0x0000_FF00, 0x0000_00FF], 0)
        .data(&[1, 2, 3, 0x40, 4, 5, 6, 0])
        .build();
    let info = probe_bmp(&file).unwrap();
    assert_eq!(info.format.masks, Some(ChannelMasks::Xrgb8888));
    let decoded = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[3, 2, 1, 255, 6, 5, 4, 255]);
}

#[test]
fn unrecognized_bitfield_masks_are_unsupported() {
    let file = BmpBuilder::new(1, 1, 16)
        .masks([0x0F00, 0x00F0, 0x000F], 0)
        .data(&[0; 4])
        .build();
    assert!(decode_err(&file).is_unsupported());

    // extended header with the right colour masks but a non-standard alpha mask
    let file = BmpBuilder::new(1, 1, 32)
        .dib_len(108)
        .masks([0x00FF_0000, 0x0000_FF00, 0x0000_00FF], 0x0000_00FF)
        .data(&[0; 4])
        .build();
    assert!(decode_err(&file).is_unsupported());

    let bitfields_at_24 = BmpBuilder::new(1, 1, 24)
        .masks([0x00FF_0000, 0x0000_FF00, 0x0000_00FF], 0)
        .data(&[0; 4])
        .build();
    assert!(decode_err(&bitfields_at_24).is_unsupported());
}

#[test]
fn bad_signature_is_unrecognized() {
    let mut file = BmpBuilder::new(1, 1, 24).data(&[0; 4]).build();
    file[0] = b'P';
    assert!(matches!(decode_err(&file), BitmapError::UnrecognizedFormat));
    assert!(!format::BMP_FORMAT.matches(&file));
}

#[test]
fn truncation_is_unexpected_eof() {
    let file = BmpBuilder::new(3, 3, 24).data(&[7; 36]).build();
    for len in [0, 1, 17, 30, 53, 60, file.len() - 1] {
        let err = decode_err(&file[..len]);
        assert!(matches!(err, BitmapError::UnexpectedEof), "len {len}: {err:?}");
    }
    assert!(decode_bmp(&file, Unstoppable).is_ok());
}

#[test]
fn truncated_palette_is_unexpected_eof() {
    let file = BmpBuilder::new(1, 1, 4).palette(&[[0, 0, 0]; 16]).data(&[0; 4]).build();
    assert!(matches!(
        probe_bmp(&file[..54 + 30]),
        Err(BitmapError::UnexpectedEof)
    ));
}

#[test]
fn oversized_colour_count_is_malformed() {
    let file = BmpBuilder::new(1, 1, 1)
        .palette(&[[0, 0, 0]; 3])
        .data(&[0; 4])
        .build();
    let err = decode_err(&file);
    assert!(matches!(err, BitmapError::InvalidHeader(_)), "{err:?}");
}

#[test]
fn planes_and_dimensions_are_checked() {
    let file = BmpBuilder::new(1, 1, 24).planes(2).data(&[0; 4]).build();
    assert!(decode_err(&file).is_unsupported());

    let file = BmpBuilder::new(-1, 1, 24).data(&[0; 4]).build();
    assert!(decode_err(&file).is_unsupported());

    let file = BmpBuilder::new(1, i32::MIN, 24).build();
    assert!(decode_err(&file).is_unsupported());
}

#[test]
fn unknown_depth_and_compression_are_unsupported() {
    let file = BmpBuilder::new(1, 1, 12).data(&[0; 4]).build();
    assert!(decode_err(&file).is_unsupported());

    // BI_JPEG
    let file = BmpBuilder::new(1, 1, 24).compression(4).data(&[0; 4]).build();
    assert!(decode_err(&file).is_unsupported());
}

#[test]
fn indexed_palette_is_exposed_by_probe() {
    let file = BmpBuilder::new(1, 1, 8)
        .palette(&[[10, 20, 30], [40, 50, 60]])
        .data(&[1, 0, 0, 0])
        .build();
    let info = probe_bmp(&file).unwrap();
    assert_eq!(info.layout, PixelLayout::Indexed8);
    assert_eq!(info.header.colors_used, 2);
    let palette = info.palette.unwrap();
    assert_eq!(palette.entries(), &[RGB8::new(10, 20, 30), RGB8::new(40, 50, 60)]);

    let decoded = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(decoded.to_rgba8(), [RGBA8::new(40, 50, 60, 255)]);
}

#[test]
fn invalid_bitmaps_are_rejected_at_construction() {
    assert!(matches!(
        Bitmap::new(2, 2, PixelLayout::Rgb8, vec![0; 11]),
        Err(BitmapError::BufferTooSmall { needed: 12, actual: 11 })
    ));
    assert!(Bitmap::with_stride(2, 1, 5, PixelLayout::Rgb8, vec![0; 6]).is_err());
    assert!(Bitmap::new(1, 1, PixelLayout::Indexed8, vec![0]).is_err());
    assert!(Palette::new(vec![]).is_err());
    assert!(Palette::new(vec![RGB8::default(); 257]).is_err());
}
