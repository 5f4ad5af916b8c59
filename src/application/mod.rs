//! Application layer: what a caller does around the batch serializer.
//!
//! Groups raw transactions into per-subsidiary batches and turns each batch into
//! a named document ready to be saved or handed on.

pub mod export;
