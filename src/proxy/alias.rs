//! Bidirectional mapping between public model aliases and canonical backend
//! model identifiers.
//!
//! A lookup miss is not a failure: unknown names pass through unchanged in
//! both directions, so models without an alias (the GPT and Gemini families)
//! use the same string on both sides of the gateway.

/// `(alias, canonical)` pairs. The alias is what API callers see; the
/// canonical form is what the backend accepts.
const ALIASES: &[(&str, &str)] = &[
    ("claude-3-5-sonnet@20240620", "claude-3-5-sonnet-20240620"),
    ("claude-3-haiku@20240307", "claude-3-haiku-20240307"),
    ("claude-3-sonnet@20240229", "claude-3-sonnet-20240229"),
    ("claude-3-opus@20240229", "claude-3-opus-20240229"),
];

/// Resolve a public alias to the canonical backend id. Case-insensitive;
/// unknown input is returned unchanged.
pub fn to_canonical(model: &str) -> String {
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(model))
        .map_or_else(|| model.to_string(), |(_, canonical)| canonical.to_string())
}

/// Inverse of [`to_canonical`]: restore the public alias for a canonical id.
/// Case-insensitive; unknown input is returned unchanged.
pub fn to_alias(model: &str) -> String {
    ALIASES
        .iter()
        .find(|(_, canonical)| canonical.eq_ignore_ascii_case(model))
        .map_or_else(|| model.to_string(), |(alias, _)| alias.to_string())
}
