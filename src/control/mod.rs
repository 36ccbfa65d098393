//! Control algorithms: pure logic, no I/O.
//!
//! * [`mapper`]: voltage → servo angle.
//! * [`homing`]: periodic zero-and-restore cycle.

pub mod homing;
pub mod mapper;
