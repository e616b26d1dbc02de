//! Core XML scanning primitives
//!
//! This module contains the building blocks of the event source:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Span: offset + length references into a buffer
//! - Entities: predefined and numeric reference expansion
//! - Nesting: open-element stack and well-formedness checks
//! - UnifiedScanner: ScanHandler-based event dispatch over one chunk

pub mod entities;
pub mod nesting;
pub mod scanner;
pub mod span;
pub mod unified_scanner;
