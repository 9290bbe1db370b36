//! pads-ares-converter: PADS ASCII footprint to ARES region file converter
//!
//! Reads the decal of a PADS ASCII (PowerPCB) export and writes it as a
//! Proteus ARES 7 region file (`.RGN`).
//!
//! # Architecture
//!
//! ```text
//! PADS text ──PadsReader──▶ Design ──AresWriter::prepare──▶ Design ──AresWriter──▶ RGN text
//!                    │                                                   │
//!                    └──────────────▶ Diagnostics ◀──────────────────────┘
//! ```
//!
//! The reader and the writer only share the unit-tagged geometric model.
//! Faults that only affect one pad, stackline or line are collected per
//! conversion instead of aborting it.
//!
//! # Example
//!
//! ```
//! use pads_ares_converter::convert::pads_to_ares;
//! use pads_ares_converter::pads::ParserOptions;
//!
//! let source = "!PADS-POWERPCB-V9.0-MILS!\n*PARTDECAL*\nR0805 I 0 0 0 1 1 0 0\nT 0 0 0 0 1\nPAD 0 3\n-2 60 R\n-1 60 R\n0 60 R\n*END*\n";
//! let conversion = pads_to_ares(source, &ParserOptions::default()).unwrap();
//! assert!(conversion.output.contains("PAD \"1\" \"CSMT-60\" ALL 0 0 0 1"));
//! ```
//!
//! # Modules
//!
//! - [`units`]: Linear units and conversion
//! - [`pcb`]: Geometric model
//! - [`diagnostics`]: Recoverable fault collection
//! - [`pads`]: PADS ASCII reader
//! - [`ares`]: ARES region file writer
//! - [`convert`]: Conversion pipeline
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types

pub mod ares;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod pads;
pub mod pcb;
pub mod units;
