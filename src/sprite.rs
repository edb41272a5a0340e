//! 8×8 sprites, stored as display columns.

/// One sprite as eight column bytes; bit 0 is the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    columns: [u8; 8],
}

impl Sprite {
    /// Builds a sprite from row bitmaps, most significant bit leftmost.
    pub const fn from_rows(rows: [u8; 8]) -> Self {
        let mut columns = [0u8; 8];
        let mut col = 0;
        while col < 8 {
            let mut row = 0;
            while row < 8 {
                if rows[row] & (0x80 >> col) != 0 {
                    columns[col] |= 1 << row;
                }
                row += 1;
            }
            col += 1;
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[u8; 8] {
        &self.columns
    }
}

pub const TURRET: Sprite = Sprite::from_rows([
    0b0001_1000,
    0b0001_1000,
    0b0001_1000,
    0b0001_1000,
    0b1111_1111,
    0b1111_1111,
    0b1111_1111,
    0b1111_1111,
]);

pub const ENEMY: Sprite = Sprite::from_rows([
    0b0000_0000,
    0b0011_0011,
    0b0111_1011,
    0b1111_1111,
    0b1111_1111,
    0b0111_1011,
    0b0011_0011,
    0b0000_0000,
]);

/// Muzzle flash drawn just above the turret.
pub const SHOT_BASE: Sprite = Sprite::from_rows([
    0b0000_1000,
    0b0001_1000,
    0b0000_1000,
    0b0001_1000,
    0b1001_0001,
    0b0101_1010,
    0b1010_0100,
    0b0000_0000,
]);

pub const BULLET: Sprite = Sprite::from_rows([
    0b0000_0000,
    0b0010_0000,
    0b0010_0000,
    0b0000_1000,
    0b0000_0000,
    0b0010_0000,
    0b0010_1000,
    0b0000_0000,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_become_columns() {
        assert_eq!(TURRET.columns(), &[0xF0, 0xF0, 0xF0, 0xFF, 0xFF, 0xF0, 0xF0, 0xF0]);
    }

    #[test]
    fn blank_edges_stay_blank() {
        assert_eq!(ENEMY.columns()[0] & 0b1000_0001, 0);
        assert_eq!(BULLET.columns()[0], 0);
    }
}
