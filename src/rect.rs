// 最大単色矩形の総当たり探索

use crate::bmp::BmpImage;

/// 軸平行の矩形。座標は(x, y)で、両端を含む。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub top_left: (u32, u32),
    pub bottom_right: (u32, u32),
}

impl Rect {
    fn degenerate() -> Self {
        Self {
            top_left: (0, 0),
            bottom_right: (0, 0),
        }
    }
}

/// 画像内で同一色のみからなる最大の矩形を探す。
///
/// 全ての (row_from ≤ row_to, col_from ≤ col_to) の組を列挙し、
/// 候補ごとに O(面積) の均一性検査を行う総当たり O(rows²·cols²)。
///
/// 最良解の更新規則は参照実装をそのまま踏襲する:
/// - 面積が最大値を上回れば候補を丸ごと採用
/// - 面積が同じで、かつ上端行が現在の最良解と一致する場合は
///   列の範囲だけを候補のものに置き換える（後から列挙された
///   同面積・同上端行の候補が勝つ）
pub fn find_max_rect(image: &BmpImage) -> Rect {
    let rows = image.height;
    let cols = image.width;
    let mut best = Rect::degenerate();

    if rows == 0 || cols == 0 {
        // ピクセルが存在しないので走査しない
        return best;
    }

    let mut max_area: usize = 0;
    for row_from in 0..rows {
        for row_to in row_from..rows {
            for col_from in 0..cols {
                for col_to in col_from..cols {
                    let area = uniform_area(image, row_from, row_to, col_from, col_to);

                    if area > max_area {
                        max_area = area;
                        best = Rect {
                            top_left: (col_from, row_from),
                            bottom_right: (col_to, row_to),
                        };
                    } else if area == max_area && row_from == best.top_left.1 {
                        best.top_left.0 = col_from;
                        best.bottom_right.0 = col_to;
                    }
                }
            }
        }
    }

    best
}

/// 矩形が単色なら面積を、1ピクセルでも異なれば0を返す。
/// 基準色は左上隅 (row_from, col_from) の色。
fn uniform_area(image: &BmpImage, row_from: u32, row_to: u32, col_from: u32, col_to: u32) -> usize {
    let color = image.pixel(row_from, col_from);

    for row in row_from..=row_to {
        for col in col_from..=col_to {
            if image.pixel(row, col) != color {
                return 0;
            }
        }
    }

    ((col_to - col_from + 1) as usize) * ((row_to - row_from + 1) as usize)
}
