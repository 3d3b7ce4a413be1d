//! Serde default functions shared by the config and changelog formats.

/// Serde default function that returns `true`.
///
/// Used for the guard policy switches, which are on unless disabled.
pub fn default_true() -> bool {
    true
}
