//! HTML import tests

mod import;
mod leniency;
