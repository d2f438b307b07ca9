//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal or a pipe
//! - deterministic output (helpful for golden tests)
//!
//! Tile map: one cell per state, `AB` + two shade characters (low `.` → high `@`).
//! Scatter: observed states `o`, trend line `-`.

use crate::aggregate::StateTable;
use crate::domain::Dataset;
use crate::domain::tiles::{GRID_COLS, GRID_ROWS, TILES};
use crate::plot::palette::normalize;
use crate::trend::TrendResult;

/// Low → high.
pub const SHADES: [char; 9] = ['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const CELL_WIDTH: usize = 5;

/// Shade character for a ratio within `(lo, hi)`.
pub fn shade_for(value: f64, lo: f64, hi: f64) -> char {
    let u = normalize(value, lo, hi);
    let idx = (u * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[idx.min(SHADES.len() - 1)]
}

/// Render the state table as a tile-grid choropleth.
pub fn render_tile_map(table: &StateTable, dataset: Dataset, title: &str) -> String {
    let (lo, hi) = table.ratio_range().unwrap_or((0.0, 1.0));

    let mut grid = vec![vec![" ".repeat(CELL_WIDTH); GRID_COLS]; GRID_ROWS];
    for &(abbr, row, col) in TILES.iter() {
        grid[row][col] = match table.by_abbreviation(abbr) {
            Some(state) => {
                let shade = shade_for(state.ratio, lo, hi);
                format!("{abbr}{shade}{shade} ")
            }
            // No data for this tile.
            None => format!("{abbr}   "),
        };
    }

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    for row in grid {
        let line: String = row.concat();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "Scale ({}): {} {lo:.2}% … {hi:.2}% {}\n",
        dataset.ratio_label(),
        SHADES[0],
        SHADES[SHADES.len() - 1]
    ));
    out
}

/// Render the poverty/uninsured scatter with its trend line.
pub fn render_scatter(result: &TrendResult, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let [x_min, x_max] = pad_range(result.x_bounds(), 0.02);
    let line = result.line_samples(width);
    let mut y_bounds = result.y_bounds();
    for &(_, y) in &line {
        y_bounds[0] = y_bounds[0].min(y);
        y_bounds[1] = y_bounds[1].max(y);
    }
    let [y_min, y_max] = pad_range(y_bounds, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so points overlay it.
    let mut prev = None;
    for &(x, y) in &line {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(&mut grid, x0, y0, cx, cy, '-'),
            None => grid[cy][cx] = '-',
        }
        prev = Some((cx, cy));
    }

    for (x, y) in result.xy() {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        grid[cy][cx] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: poverty=[{x_min:.2}, {x_max:.2}]% | uninsured=[{y_min:.2}, {y_max:.2}]%\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "r={:.3} r²={:.3} | uninsured% = {:.3} + {:.3} × poverty%\n",
        result.pearson_r, result.r_squared, result.line.intercept, result.line.slope
    ));
    out
}

fn pad_range([min, max]: [f64; 2], frac: f64) -> [f64; 2] {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-9);
    [min - pad, max + pad]
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::StateRow;
    use crate::math::LineFit;
    use crate::trend::TrendPoint;

    fn row(code: u32, abbr: &str, ratio: f64) -> StateRow {
        StateRow {
            state_code: code,
            fips_code: format!("{code:02}"),
            abbreviation: abbr.to_string(),
            ratio,
            complement_total: 90,
            subject_total: 10,
            population_total: 100,
        }
    }

    #[test]
    fn shades_span_the_ramp() {
        assert_eq!(shade_for(0.0, 0.0, 8.0), '.');
        assert_eq!(shade_for(8.0, 0.0, 8.0), '@');
        assert_eq!(shade_for(4.0, 0.0, 8.0), '+');
    }

    #[test]
    fn tile_map_places_states_on_grid() {
        let table = StateTable {
            rows: vec![row(2, "AK", 5.0), row(23, "ME", 15.0), row(48, "TX", 10.0)],
        };
        let out = render_tile_map(&table, Dataset::Insurance, "Uninsured");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Uninsured");
        // Row 0: AK at col 0, ME at col 10.
        assert!(lines[1].starts_with("AK.. "));
        assert!(lines[1].ends_with("ME@@"));
        assert_eq!(&lines[1][50..54], "ME@@");
        // Row 7: TX at col 3 sits mid-scale; HI has no data.
        assert!(lines[8].starts_with("HI   "));
        assert_eq!(&lines[8][15..19], "TX++");
        assert!(lines[9].contains("% uninsured"));
        assert!(lines[9].contains("5.00%"));
        assert!(lines[9].contains("15.00%"));
    }

    #[test]
    fn scatter_golden_snapshot_small() {
        let result = TrendResult {
            points: vec![
                TrendPoint {
                    state_code: 1,
                    abbreviation: "AL".into(),
                    poverty_ratio: 10.0,
                    uninsured_ratio: 5.0,
                },
                TrendPoint {
                    state_code: 2,
                    abbreviation: "AK".into(),
                    poverty_ratio: 20.0,
                    uninsured_ratio: 15.0,
                },
            ],
            pearson_r: 1.0,
            r_squared: 1.0,
            line: LineFit {
                intercept: -5.0,
                slope: 1.0,
            },
            unmatched: Vec::new(),
        };

        let out = render_scatter(&result, 10, 5);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Plot: poverty="));
        // Lowest point bottom-left, highest top-right; the line joins them.
        assert!(lines[5].starts_with('o'));
        assert!(lines[1].ends_with('o'));
        assert!(out.contains('-'));
        assert!(lines[6].starts_with("r=1.000"));
    }
}
