pub mod assemble;
pub mod grid;
pub mod tap;

pub use assemble::{assemble_tap, correct_strength_decimal, data_rows, AssemblyOptions, Column};
pub use grid::{segment, Cell, CellGrid, GridError, GridLineSet};
pub use tap::Tap;
