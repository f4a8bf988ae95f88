#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(width: i32, height: i32, bpp: u16, compression: u32, palette: u32, data_len: u32) -> Vec<u8> {
    let offset = 54 + palette * 4;
    let mut h = vec![0u8; 54];
    h[0] = b'B'; h[1] = b'M';
    h[2..6].copy_from_slice(&(offset + data_len).to_le_bytes()); // file size
    h[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    h[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    h[18..22].copy_from_slice(&width.to_le_bytes());
    h[22..26].copy_from_slice(&height.to_le_bytes());
    h[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    h[28..30].copy_from_slice(&bpp.to_le_bytes());
    h[30..34].copy_from_slice(&compression.to_le_bytes());
    h[34..38].copy_from_slice(&data_len.to_le_bytes());
    h[46..50].copy_from_slice(&palette.to_le_bytes()); // colours used
    h
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit
    let mut bmp = header(1, 1, 24, 0, 0, 4);
    bmp.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]);
    fs::write(format!("{dir}/bmp_1x1.bmp"), bmp).unwrap();

    // 3x2 top-down 32-bit with alpha
    let mut bmp = header(3, -2, 32, 0, 0, 24);
    bmp.extend((0..24u8).map(|i| i * 10));
    fs::write(format!("{dir}/bmp_3x2_topdown_32.bmp"), bmp).unwrap();

    // 9x1 1-bit, two colours
    let mut bmp = header(9, 1, 1, 0, 2, 4);
    bmp.extend_from_slice(&[0, 0, 0, 0, 255, 255, 255, 0]);
    bmp.extend_from_slice(&[0b1010_1010, 0b1000_0000, 0, 0]);
    fs::write(format!("{dir}/bmp_9x1_1bit.bmp"), bmp).unwrap();

    // 4x2 RLE8: a run, end of line, an absolute run, end of bitmap
    let stream = [4u8, 1, 0, 0, 0, 3, 0, 1, 0, 0, 0, 1];
    let mut bmp = header(4, 2, 8, 1, 2, stream.len() as u32);
    bmp.extend_from_slice(&[0, 0, 0, 0, 0, 0, 255, 0]);
    bmp.extend_from_slice(&stream);
    fs::write(format!("{dir}/bmp_4x2_rle8.bmp"), bmp).unwrap();

    // 4x1 RLE4
    let stream = [4u8, 0x12, 0, 1];
    let mut bmp = header(4, 1, 4, 2, 3, stream.len() as u32);
    bmp.extend_from_slice(&[0, 0, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0]);
    bmp.extend_from_slice(&stream);
    fs::write(format!("{dir}/bmp_4x1_rle4.bmp"), bmp).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut bad_dib = header(1, 1, 24, 0, 0, 4);
    bad_dib[14] = 44;
    fs::write(format!("{dir}/bmp_dib44.bin"), bad_dib).unwrap();

    println!("Generated seed corpus in {dir}/");
}
