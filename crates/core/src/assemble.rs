use crate::grid::{Cell, CellGrid};
use crate::tap::Tap;

/// Marker the venue prints in front of a brewery name when the tap is on sale.
const SALE_MARKER: &str = "**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Repair ABV readings that lost their decimal point (`75%` → `7.5%`).
    pub correct_strength: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self { correct_strength: true }
    }
}

/// The seven data columns that follow the tap-number column, in printed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Brewery,
    Name,
    Style,
    Location,
    Abv,
    CrowlerPrice,
    GrowlerPrice,
}

impl Column {
    pub const ORDER: [Column; 7] = [
        Column::Brewery,
        Column::Name,
        Column::Style,
        Column::Location,
        Column::Abv,
        Column::CrowlerPrice,
        Column::GrowlerPrice,
    ];

    /// Column at a zero-based position after the tap-number column.
    /// Positions past the last known column have no meaning and are ignored.
    pub fn at(index: usize) -> Option<Column> {
        Self::ORDER.get(index).copied()
    }

    /// Normalize recognized text and store it in the matching field.
    /// Blank text leaves the field at its default.
    pub fn apply(self, tap: &mut Tap, text: &str, options: &AssemblyOptions) {
        if text.trim().is_empty() {
            return;
        }
        match self {
            Column::Brewery => {
                let text = text.trim_start();
                let text = match text.strip_prefix(SALE_MARKER) {
                    Some(rest) => {
                        tap.on_sale = true;
                        rest
                    }
                    None => text,
                };
                tap.brewery = join_lines(text);
            }
            Column::Name => tap.name = join_lines(text),
            Column::Style => tap.style = join_lines(text),
            Column::Location => tap.location = join_lines(text),
            Column::Abv => {
                let text = text.trim();
                tap.abv = if options.correct_strength {
                    correct_strength_decimal(text)
                } else {
                    text.to_string()
                };
            }
            Column::CrowlerPrice => tap.crowler_price = strip_whitespace(text),
            Column::GrowlerPrice => tap.growler_price = strip_whitespace(text),
        }
    }
}

/// Build one tap from the recognized text of its data cells, tap-number
/// cell already removed.
pub fn assemble_tap<I, S>(tap_number: u32, texts: I, options: &AssemblyOptions) -> Tap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tap = Tap::new(tap_number);
    for (index, text) in texts.into_iter().enumerate() {
        if let Some(column) = Column::at(index) {
            column.apply(&mut tap, text.as_ref(), options);
        }
    }
    tap
}

/// Rows that carry taps: everything between the header row and the footer row.
pub fn data_rows(grid: &CellGrid) -> &[Vec<Cell>] {
    let rows = grid.rows();
    if rows.len() < 2 {
        return &[];
    }
    &rows[1..rows.len() - 1]
}

/// Recognition regularly drops the decimal point from ABV readings. The
/// printed values always carry one digit after the point, so a reading
/// without a `.` three characters from the end gets one inserted two
/// characters from the end. Readings shorter than three characters pass
/// through unchanged.
pub fn correct_strength_decimal(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len < 3 || chars[len - 3] == '.' {
        return text.to_string();
    }
    let mut corrected: String = chars[..len - 2].iter().collect();
    corrected.push('.');
    corrected.extend(&chars[len - 2..]);
    corrected
}

fn join_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
