//! Fixed parameters of the angular-distribution tables and of the
//! fixed-width source format.

pub const DEFAULT_MAX_ORDER: usize = 8;
pub const DEFAULT_HEADER_LINES: usize = 12;
pub const DEFAULT_MAX_RECORDS: usize = 10_000;
pub const DEFAULT_BIN_COUNT: usize = 100;
pub const DEFAULT_EPSILON: f64 = 1.0e-3;
pub const DEFAULT_DENSITY_GRID_POINTS: usize = 100;

/// Roots with a larger imaginary part are treated as complex.
pub const ROOT_IMAGINARY_TOLERANCE: f64 = 1.0e-3;
/// Slack allowed on `|mu| <= 1` for solved and stored cosines.
pub const ROOT_DOMAIN_LIMIT: f64 = 1.001;

pub const FIELD_WIDTH: usize = 11;
/// Column 11 separates the energy field from the coefficient fields.
pub const COEFFICIENT_COLUMN_START: usize = 12;
pub const HEADER_COEFFICIENT_FIELDS: usize = 6;
pub const CONTINUATION_COEFFICIENT_FIELDS: usize = 2;

pub const TABLE_SIGNIFICANT_DIGITS: usize = 8;
/// Relative slack when matching table energies printed with `%.8e`.
pub const ENERGY_MATCH_RELATIVE_TOLERANCE: f64 = 1.0e-7;
