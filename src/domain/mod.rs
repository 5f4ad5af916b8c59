//! Domain layer: money scaling, source transactions, batch document records and ports.

pub mod money;
pub mod pmis;
pub mod ports;
pub mod transaction;
