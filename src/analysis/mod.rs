//! Analysis Layer
//!
//! Joins OCR tokens with classifier-flagged ingredient terms. The matcher is
//! pure computation: no I/O, no locks, safe to re-run or memoize.

pub mod matcher;

pub use matcher::{match_tokens, normalize, FlaggedTerm, MatchedAnnotation};
