// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules together into the interactive tool.
//
// Module responsibilities:
// - `person`: the validated person model (gender, age, height, weight)
//   and the BMI calculation.
// - `reference`: WHO reference curves, persisted as editable CSV files.
// - `chart`: chart description and the `plotters` renderer.
// - `term`: console abstraction over the terminal or any line reader.
// - `ui`: the menu-driven session that ties everything together.
// - `config`: defaults, optional JSON file and environment overrides.
//
// The model knows nothing about prompts or plotting, so validation can be
// tested on its own and the renderer can be swapped out.
pub mod chart;
pub mod config;
pub mod error;
pub mod person;
pub mod reference;
pub mod term;
pub mod ui;

pub use error::{InvalidInput, TableError};
pub use person::{Gender, Person, Sex};
