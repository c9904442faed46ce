//! Per-frame data for the rendering collaborator

use serde::{Deserialize, Serialize};

use crate::grid::GridPos;
use crate::paytable::WinningLine;
use crate::reel::{ReelGeometry, ReelState};
use crate::symbols::SymbolId;

/// A point in window pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Pixel placement of the reel window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Left edge of reel 0
    pub origin_x: f64,
    /// Top edge of the visible window
    pub origin_y: f64,
    pub symbol_width: f64,
    pub symbol_height: f64,
}

impl Layout {
    pub fn new(origin_x: f64, origin_y: f64, geometry: &ReelGeometry) -> Self {
        Self {
            origin_x,
            origin_y,
            symbol_width: geometry.symbol_width,
            symbol_height: geometry.symbol_height,
        }
    }

    pub fn reel_x(&self, reel: usize) -> f64 {
        self.origin_x + reel as f64 * self.symbol_width
    }

    /// Top edge of buffer slot `slot` (0 = lookahead) at scroll `offset`
    pub fn sprite_y(&self, slot: usize, offset: f64) -> f64 {
        self.origin_y + (slot as f64 - 1.0) * self.symbol_height - offset
    }

    /// Center of a grid cell
    pub fn cell_center(&self, pos: GridPos) -> Point {
        Point {
            x: self.reel_x(pos.reel as usize) + self.symbol_width / 2.0,
            y: self.origin_y + (f64::from(pos.row) + 0.5) * self.symbol_height,
        }
    }

    /// Polyline through the matched cells of a winning line
    pub fn line_points(&self, line: &WinningLine) -> Vec<Point> {
        line.positions.iter().map(|&p| self.cell_center(p)).collect()
    }
}

/// One sprite of a reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub symbol: SymbolId,
    pub x: f64,
    pub y: f64,
}

/// Render state of one reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelFrame {
    pub reel_index: usize,
    pub spinning: bool,
    pub offset: f64,
    /// Buffer sprites, lookahead first
    pub sprites: Vec<SpriteFrame>,
}

impl ReelFrame {
    pub fn capture(reel: &ReelState, layout: &Layout) -> Self {
        let x = layout.reel_x(reel.index());
        let sprites = reel
            .buffer()
            .enumerate()
            .map(|(slot, symbol)| SpriteFrame {
                symbol: symbol.clone(),
                x,
                y: layout.sprite_y(slot, reel.offset()),
            })
            .collect();

        Self {
            reel_index: reel.index(),
            spinning: reel.is_spinning(),
            offset: reel.offset(),
            sprites,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub reels: Vec<ReelFrame>,
    pub winning_lines: Vec<WinningLine>,
    pub balance: f64,
    /// Total of the last settled spin (0 while spinning)
    pub last_win: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_positions_follow_offset() {
        let layout = Layout::new(100.0, 50.0, &ReelGeometry::default());
        assert_eq!(layout.sprite_y(0, 0.0), 50.0 - 140.0);
        assert_eq!(layout.sprite_y(1, 0.0), 50.0);
        // negative offset scrolls sprites downward
        assert_eq!(layout.sprite_y(1, -70.0), 120.0);
    }

    #[test]
    fn test_cell_center() {
        let layout = Layout::new(100.0, 50.0, &ReelGeometry::default());
        let p = layout.cell_center(GridPos::new(2, 1));
        assert_eq!(p, Point { x: 310.0, y: 400.0 });
    }

    #[test]
    fn test_line_points_trace_matched_cells() {
        let layout = Layout::new(0.0, 0.0, &ReelGeometry::default());
        let line = WinningLine {
            line_index: 3,
            symbol: "c".into(),
            match_count: 3,
            positions: vec![GridPos::new(0, 0), GridPos::new(1, 1), GridPos::new(2, 2)],
            win_amount: 1.0,
        };

        let points = layout.line_points(&line);
        assert_eq!(
            points,
            vec![
                Point { x: 70.0, y: 70.0 },
                Point { x: 210.0, y: 210.0 },
                Point { x: 350.0, y: 350.0 },
            ]
        );
    }
}
