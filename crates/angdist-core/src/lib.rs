pub mod common;
pub mod domain;
pub mod modules;
pub mod numerics;

pub use common::{ExecutionMode, PipelineConfig, ValidationStrictness};
pub use domain::{
    AngdistError, AngdistResult, BinTable, BinTableRow, DensityRow, DensityTable, EnergyRecord,
    ErrorCategory,
};
