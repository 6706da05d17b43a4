//! Flutter-facing bindings over `memomark_core`.

pub mod api;
