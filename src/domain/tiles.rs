//! Equal-area tile grid of the 50 states + DC.
//!
//! Each state occupies one cell of an 8×11 grid that roughly follows its
//! geographic position. Both choropleth renderers (TUI and plain text) draw
//! from this table.

pub const GRID_ROWS: usize = 8;
pub const GRID_COLS: usize = 11;

/// `(abbreviation, row, col)`
pub const TILES: [(&str, usize, usize); 51] = [
    ("AK", 0, 0),
    ("ME", 0, 10),
    ("VT", 1, 9),
    ("NH", 1, 10),
    ("WA", 2, 0),
    ("ID", 2, 1),
    ("MT", 2, 2),
    ("ND", 2, 3),
    ("MN", 2, 4),
    ("IL", 2, 5),
    ("WI", 2, 6),
    ("MI", 2, 7),
    ("NY", 2, 8),
    ("RI", 2, 9),
    ("MA", 2, 10),
    ("OR", 3, 0),
    ("NV", 3, 1),
    ("WY", 3, 2),
    ("SD", 3, 3),
    ("IA", 3, 4),
    ("IN", 3, 5),
    ("OH", 3, 6),
    ("PA", 3, 7),
    ("NJ", 3, 8),
    ("CT", 3, 9),
    ("CA", 4, 0),
    ("UT", 4, 1),
    ("CO", 4, 2),
    ("NE", 4, 3),
    ("MO", 4, 4),
    ("KY", 4, 5),
    ("WV", 4, 6),
    ("VA", 4, 7),
    ("MD", 4, 8),
    ("DE", 4, 9),
    ("AZ", 5, 1),
    ("NM", 5, 2),
    ("KS", 5, 3),
    ("AR", 5, 4),
    ("TN", 5, 5),
    ("NC", 5, 6),
    ("SC", 5, 7),
    ("DC", 5, 8),
    ("OK", 6, 3),
    ("LA", 6, 4),
    ("MS", 6, 5),
    ("AL", 6, 6),
    ("GA", 6, 7),
    ("HI", 7, 0),
    ("TX", 7, 3),
    ("FL", 7, 8),
];

/// Grid position for an abbreviation (case-insensitive).
pub fn tile_position(abbreviation: &str) -> Option<(usize, usize)> {
    TILES
        .iter()
        .find(|(abbr, _, _)| abbr.eq_ignore_ascii_case(abbreviation))
        .map(|&(_, row, col)| (row, col))
}
