pub mod bins;
pub mod density;
pub mod parser;
pub mod sampling;
pub mod serialization;
pub mod series;
pub mod traits;
pub mod validation;

pub use bins::{
    RootSolveError, build_bin_table, build_bin_table_with, solve_record, solve_record_with,
};
pub use density::tabulate_density;
pub use parser::{ParseError, parse_field, parse_records};
pub use sampling::{DensityLookup, InverseCdfSampler, SamplingError};
pub use serialization::{
    TableParseError, format_scientific, read_bin_table, read_density_table, render_bin_table,
    render_density_table, write_text_artifact,
};
pub use series::{CdfSeries, NormalizedSeries};
pub use traits::{CompanionRootFinder, RootFinder};
pub use validation::{ValidationError, ValidationReport, validate_bin_table};
