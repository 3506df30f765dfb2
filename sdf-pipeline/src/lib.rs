//! Multi-record driver for SD files.
//!
//! [`SdfReader`] pulls one record at a time out of the input; [`Driver`] (and
//! the [`parse_sdf`] / [`parse_sdf_with`] shortcuts) collects them into an
//! [`SdfFile`], yielding to a [`Progress`] collaborator between records only.

pub mod driver;
pub mod outcome;
pub mod progress;
pub mod reader;

pub use driver::{parse_sdf, parse_sdf_with, Driver};
pub use outcome::{Cancelled, ParseFailure, ParseOutcome, SdfFile};
pub use progress::{CancelFlag, NoProgress, Progress, YieldPolicy};
pub use reader::SdfReader;
pub use sdf_parser::{Compound, ParserOptions};
