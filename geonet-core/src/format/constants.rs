//! Format constants shared by every network file

/// Width of one preamble label or value
pub const PREAMBLE_FIELD_WIDTH: usize = 10;

/// Total preamble size: three label/value pairs
pub const PREAMBLE_SIZE: usize = 6 * PREAMBLE_FIELD_WIDTH;

/// Size of the native `u64` record count following the preamble
pub const COUNT_SIZE: usize = 8;

/// Preamble labels in file order
pub const PREAMBLE_LABELS: [&str; 3] = ["VERSION", "CREATED ON", "CREATED BY"];

/// Maximum record count accepted before any allocation
pub const MAX_RECORD_COUNT: u64 = u32::MAX as u64;

/// Fixed text widths for station records
pub mod station {
    pub const NAME_WIDTH: usize = 32;
    pub const NAME_ORIG_WIDTH: usize = 40;
    pub const CONSTRAINT_WIDTH: usize = 4;
    pub const TYPE_WIDTH: usize = 4;
    pub const DESCRIPTION_WIDTH: usize = 128;
    pub const PLATE_WIDTH: usize = 4;
}

/// Fixed text widths for reference system fields
pub mod reference {
    /// EPSG code, e.g. "7843"
    pub const EPSG_WIDTH: usize = 8;
    /// Epoch, e.g. "01.01.2020"
    pub const EPOCH_WIDTH: usize = 12;
    /// Coordinate type code
    pub const COORD_TYPE_WIDTH: usize = 4;
}

/// Binary metadata block constants
pub mod metadata {
    /// Modifier name width
    pub const MODIFIED_BY_WIDTH: usize = 20;

    /// Provenance filename width
    pub const FILENAME_WIDTH: usize = 256;

    /// Upper bound on provenance entries read from one file
    pub const MAX_INPUT_FILES: u64 = 65_536;
}
