//! The translation core: alias mapping, message normalization, backend
//! selection, bounded retry, and the two reply translators.

pub mod alias;
pub mod normalize;
pub mod retry;
pub mod selector;
pub mod stream;
pub mod translate;
