// 24bit無圧縮Windowsビットマップのデコーダー

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// パックされた1ピクセル。ファイル上のB,G,Rの3バイトを
/// `(b << 16) | (g << 8) | r` の形で1整数に詰める（0BGRレイアウト）。
pub type Pixel = u32;

/// ファイル先頭2バイトのマジック "BM"（リトルエンディアン読み）
const BMP_MAGIC: u16 = 0x4D42;

/// ファイルヘッダー14バイト + 情報ヘッダー40バイト
const HEADER_LEN: usize = 54;

const BYTES_PER_PIXEL: usize = 3;

/// デコード失敗の型。ローダーがスキップ種別を数え分けられるよう、
/// フォーマット系とI/O系を区別する。
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}: not a bitmap file")]
    NotABitmap(PathBuf),

    #[error("{path}: unsupported bit depth {bit_count} (only 24-bit bitmaps are supported)")]
    UnsupportedDepth { path: PathBuf, bit_count: u16 },

    #[error("{path}: compressed bitmaps are not supported (compression={compression})")]
    Compressed { path: PathBuf, compression: u32 },

    #[error("{0}: pixel data is truncated")]
    Truncated(PathBuf),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DecodeError {
    /// I/O起因かどうか。falseならフォーマット不正。
    pub fn is_io(&self) -> bool {
        matches!(self, DecodeError::Io { .. })
    }
}

/// デコード済みのビットマップ画像。デコード後は不変。
#[derive(Debug)]
pub struct BmpImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pixels: Vec<Pixel>,
}

impl BmpImage {
    /// 上から下へ行順に並んだピクセル列から画像を組み立てる
    pub fn from_raw(path: PathBuf, width: u32, height: u32, pixels: Vec<Pixel>) -> Self {
        assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize),
            "pixel buffer size must match width * height"
        );
        Self {
            path,
            width,
            height,
            pixels,
        }
    }

    /// 行0が視覚上の最上段
    pub fn pixel(&self, row: u32, col: u32) -> Pixel {
        self.pixels[(row as usize) * (self.width as usize) + (col as usize)]
    }
}

fn u16_at(header: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([header[at], header[at + 1]])
}

fn u32_at(header: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([
        header[at],
        header[at + 1],
        header[at + 2],
        header[at + 3],
    ])
}

/// 1ファイルをデコードする。マジック・ビット深度・圧縮の検証は
/// ピクセルバッファを確保する前に行い、不一致なら即座に失敗する。
pub fn decode_bmp(path: &Path) -> Result<BmpImage, DecodeError> {
    let mut file = File::open(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut header = [0u8; HEADER_LEN];
    file.read_exact(&mut header).map_err(|source| {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            // ヘッダーすら揃わないファイルはビットマップではない
            DecodeError::NotABitmap(path.to_path_buf())
        } else {
            DecodeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if u16_at(&header, 0) != BMP_MAGIC {
        return Err(DecodeError::NotABitmap(path.to_path_buf()));
    }

    let pixels_address = u32_at(&header, 10);
    let width = u32_at(&header, 18) as i32;
    let height = u32_at(&header, 22) as i32;
    let bit_count = u16_at(&header, 28);
    let compression = u32_at(&header, 30);

    if bit_count != 24 {
        return Err(DecodeError::UnsupportedDepth {
            path: path.to_path_buf(),
            bit_count,
        });
    }
    if compression != 0 {
        return Err(DecodeError::Compressed {
            path: path.to_path_buf(),
            compression,
        });
    }
    if width < 0 || height < 0 {
        // 負の寸法（トップダウン形式など）は対象外
        return Err(DecodeError::NotABitmap(path.to_path_buf()));
    }

    let width = width as usize;
    let height = height as usize;

    // 各行は4バイト境界までパディングされて格納されている
    let row_bytes = width * BYTES_PER_PIXEL;
    let padded_row_bytes = (row_bytes + 3) & !3;

    file.seek(SeekFrom::Start(u64::from(pixels_address)))
        .map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut raw = vec![0u8; padded_row_bytes * height];
    file.read_exact(&mut raw).map_err(|source| {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated(path.to_path_buf())
        } else {
            DecodeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    // 行はファイル内で下から上の順。行0が最上段になるよう詰め直す。
    let mut pixels = vec![0 as Pixel; width * height];
    for row in 0..height {
        let src_row = (height - 1 - row) * padded_row_bytes;
        for col in 0..width {
            let at = src_row + col * BYTES_PER_PIXEL;
            let (b, g, r) = (raw[at], raw[at + 1], raw[at + 2]);
            pixels[row * width + col] =
                (Pixel::from(b) << 16) | (Pixel::from(g) << 8) | Pixel::from(r);
        }
    }

    Ok(BmpImage::from_raw(
        path.to_path_buf(),
        width as u32,
        height as u32,
        pixels,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// 上から下の行順で与えたRGBグリッドからBMPファイルのバイト列を作る
    fn bmp_bytes(width: u32, height: u32, rows: &[Vec<(u8, u8, u8)>]) -> Vec<u8> {
        assert_eq!(rows.len(), height as usize);
        let row_bytes = width as usize * 3;
        let padded_row_bytes = (row_bytes + 3) & !3;
        let image_size = padded_row_bytes * height as usize;

        let mut bytes = Vec::with_capacity(HEADER_LEN + image_size);
        // ファイルヘッダー
        bytes.extend_from_slice(b"BM");
        bytes.extend_from_slice(&((HEADER_LEN + image_size) as u32).to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes()); // 予約
        bytes.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes()); // ピクセル位置
        // 情報ヘッダー
        bytes.extend_from_slice(&40u32.to_le_bytes());
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // プレーン数
        bytes.extend_from_slice(&24u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes()); // 無圧縮
        bytes.extend_from_slice(&(image_size as u32).to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]); // 解像度・色数は未使用

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

    fn packed(r: u8, g: u8, b: u8) -> Pixel {
        (Pixel::from(b) << 16) | (Pixel::from(g) << 8) | Pixel::from(r)
    }

    #[test]
    fn test_decode_reproduces_grid_with_row_padding() {
        // 幅5は5*3=15バイトで4の倍数でないため、各行に1バイトのパディングが入る
        let rows = vec![
            vec![(1, 2, 3), (4, 5, 6), (7, 8, 9), (10, 11, 12), (13, 14, 15)],
            vec![(0, 0, 0), (255, 255, 255), (1, 1, 1), (2, 2, 2), (3, 3, 3)],
            vec![(9, 9, 9), (8, 8, 8), (7, 7, 7), (6, 6, 6), (5, 5, 5)],
        ];
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("grid.bmp");
        fs::write(&path, bmp_bytes(5, 3, &rows)).unwrap();

        let image = decode_bmp(&path).unwrap();

        assert_eq!(image.width, 5);
        assert_eq!(image.height, 3);
        for (row_index, row) in rows.iter().enumerate() {
            for (col_index, &(r, g, b)) in row.iter().enumerate() {
                assert_eq!(
                    image.pixel(row_index as u32, col_index as u32),
                    packed(r, g, b),
                    "mismatch at row {row_index}, col {col_index}"
                );
            }
        }
    }

    #[test]
    fn test_decode_aligned_width() {
        // 幅4は4*3=12バイトでパディングなし
        let rows = vec![
            vec![(1, 0, 0), (2, 0, 0), (3, 0, 0), (4, 0, 0)],
            vec![(5, 0, 0), (6, 0, 0), (7, 0, 0), (8, 0, 0)],
        ];
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("aligned.bmp");
        fs::write(&path, bmp_bytes(4, 2, &rows)).unwrap();

        let image = decode_bmp(&path).unwrap();
        assert_eq!(image.pixel(0, 0), packed(1, 0, 0));
        assert_eq!(image.pixel(1, 3), packed(8, 0, 0));
    }

    #[test]
    fn test_decode_rejects_wrong_magic() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("fake.bmp");
        let mut bytes = bmp_bytes(2, 2, &vec![vec![(0, 0, 0); 2]; 2]);
        bytes[0] = b'X';
        fs::write(&path, bytes).unwrap();

        let error = decode_bmp(&path).unwrap_err();
        assert!(matches!(error, DecodeError::NotABitmap(_)));
        assert!(!error.is_io());
    }

    #[test]
    fn test_decode_rejects_unsupported_depth() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("deep.bmp");
        let mut bytes = bmp_bytes(2, 2, &vec![vec![(0, 0, 0); 2]; 2]);
        bytes[28] = 32; // bit_count
        fs::write(&path, bytes).unwrap();

        let error = decode_bmp(&path).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::UnsupportedDepth { bit_count: 32, .. }
        ));
    }

    #[test]
    fn test_decode_rejects_compression() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("rle.bmp");
        let mut bytes = bmp_bytes(2, 2, &vec![vec![(0, 0, 0); 2]; 2]);
        bytes[30] = 1; // compression
        fs::write(&path, bytes).unwrap();

        let error = decode_bmp(&path).unwrap_err();
        assert!(matches!(error, DecodeError::Compressed { .. }));
    }

    #[test]
    fn test_decode_rejects_truncated_pixel_data() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("short.bmp");
        let mut bytes = bmp_bytes(4, 4, &vec![vec![(0, 0, 0); 4]; 4]);
        bytes.truncate(bytes.len() - 8);
        fs::write(&path, bytes).unwrap();

        let error = decode_bmp(&path).unwrap_err();
        assert!(matches!(error, DecodeError::Truncated(_)));
    }

    #[test]
    fn test_decode_short_header_is_not_a_bitmap() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tiny.bmp");
        fs::write(&path, b"BM").unwrap();

        let error = decode_bmp(&path).unwrap_err();
        assert!(matches!(error, DecodeError::NotABitmap(_)));
    }

    #[test]
    fn test_decode_missing_file_is_io() {
        let error = decode_bmp(Path::new("/nonexistent/never.bmp")).unwrap_err();
        assert!(error.is_io());
    }
}
