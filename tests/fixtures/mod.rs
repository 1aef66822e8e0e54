// テスト用のBMPファイル生成ヘルパー

use std::fs;
use std::path::Path;

/// 上から下の行順で与えたRGBグリッドからBMPファイルのバイト列を作る
pub fn bmp_bytes(width: u32, height: u32, rows: &[Vec<(u8, u8, u8)>]) -> Vec<u8> {
    assert_eq!(rows.len(), height as usize);
    let row_bytes = width as usize * 3;
    let padded_row_bytes = (row_bytes + 3) & !3;
    let image_size = padded_row_bytes * height as usize;

    let mut bytes = Vec::with_capacity(54 + image_size);
    // ファイルヘッダー
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&((54 + image_size) as u32).to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&54u32.to_le_bytes());
    // 情報ヘッダー
    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&(image_size as u32).to_le_bytes());
    bytes.extend_from_slice(&[0u8; 16]);

    // ピクセルは下の行から、B,G,Rの順で
    for row in rows.iter().rev() {
        assert_eq!(row.len(), width as usize);
        for &(r, g, b) in row {
            bytes.extend_from_slice(&[b, g, r]);
        }
        bytes.extend(std::iter::repeat(0u8).take(padded_row_bytes - row_bytes));
    }
    bytes
}

/// 単色(w x h)のBMPファイルを書き出す
pub fn write_uniform_bmp(path: &Path, width: u32, height: u32, rgb: (u8, u8, u8)) {
    let rows = vec![vec![rgb; width as usize]; height as usize];
    fs::write(path, bmp_bytes(width, height, &rows)).unwrap();
}

/// 任意グリッドのBMPファイルを書き出す
pub fn write_bmp(path: &Path, width: u32, height: u32, rows: &[Vec<(u8, u8, u8)>]) {
    fs::write(path, bmp_bytes(width, height, rows)).unwrap();
}
