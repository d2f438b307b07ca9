//! Tile-grid choropleth widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::aggregate::StateTable;
use crate::domain::ColorScale;
use crate::domain::tiles::{GRID_COLS, GRID_ROWS, TILES};
use crate::plot::palette::{contrasting_text, normalize, sample};

const MIN_CELL_WIDTH: u16 = 4;

pub struct TileMap<'a> {
    pub table: &'a StateTable,
    pub scale: ColorScale,
    /// Abbreviation of the tile under the cursor.
    pub selected: Option<&'a str>,
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

impl<'a> Widget for TileMap<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cell_w = area.width / GRID_COLS as u16;
        let cell_h = area.height / GRID_ROWS as u16;
        if cell_w < MIN_CELL_WIDTH || cell_h == 0 {
            buf.set_string(
                area.x,
                area.y,
                "Map area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let (lo, hi) = self.table.ratio_range().unwrap_or((0.0, 1.0));

        for &(abbr, row, col) in TILES.iter() {
            let rect = Rect {
                x: area.x + col as u16 * cell_w,
                y: area.y + row as u16 * cell_h,
                // Leave a one-column gutter between tiles.
                width: cell_w - 1,
                height: cell_h,
            };

            let state = self.table.by_abbreviation(abbr);
            let (bg, fg) = match state {
                Some(s) => {
                    let c = sample(self.scale, normalize(s.ratio, lo, hi));
                    (rgb(c), rgb(contrasting_text(c)))
                }
                None => (Color::DarkGray, Color::Gray),
            };

            let mut style = Style::default().bg(bg).fg(fg);
            if self.selected.is_some_and(|sel| sel.eq_ignore_ascii_case(abbr)) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            buf.set_style(rect, style);
            buf.set_string(rect.x, rect.y, abbr, style);

            if rect.height >= 2 {
                if let Some(s) = state {
                    let label = format!("{:.1}", s.ratio);
                    if label.len() as u16 <= rect.width {
                        buf.set_string(rect.x, rect.y + 1, label, style);
                    }
                }
            }
        }
    }
}

/// Tile reached from `from` by one step in direction `(d_row, d_col)`.
///
/// Horizontal moves stay on the same row; vertical moves prefer the same
/// column, then the closest row.
pub fn neighbor(from: &str, d_row: isize, d_col: isize) -> Option<&'static str> {
    let &(_, row, col) = TILES.iter().find(|(abbr, _, _)| *abbr == from)?;
    let (row, col) = (row as isize, col as isize);

    TILES
        .iter()
        .map(|&(abbr, r, c)| (abbr, r as isize - row, c as isize - col))
        .filter(|&(_, dr, dc)| match (d_row, d_col) {
            (0, dx) => dr == 0 && dc != 0 && dc.signum() == dx.signum(),
            (dy, _) => dr != 0 && dr.signum() == dy.signum(),
        })
        .min_by_key(|&(_, dr, dc)| {
            if d_row == 0 {
                (dc.abs(), 0)
            } else {
                (dc.abs(), dr.abs())
            }
        })
        .map(|(abbr, _, _)| abbr)
}
