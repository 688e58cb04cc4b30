//! Row structs and lookup ids for the `jobs` table.

pub mod job;
pub mod status;
