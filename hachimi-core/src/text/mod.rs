//! Text structure: token runs, lines and whole-text conversion.

/// Token/separator classification and single-line rewriting.
pub mod line;

/// Whole-text conversion, significant counts and background dispatch.
pub mod converter;
