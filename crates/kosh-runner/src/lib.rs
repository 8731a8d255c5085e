//! # Kosh Runner
//!
//! Library half of the entry point: feed synthesis and the composition root
//! that wires the service graph. The binary in `main.rs` adds the CLI, the
//! ingress tasks, and the output printers.

pub mod datagen;
pub mod wiring;
