//! Wire formats: CSV in, XML batch documents out.

pub mod csv;
pub mod xml;
