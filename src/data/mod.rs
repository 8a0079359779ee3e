/// Data layer: decoding, loading and column extraction.
///
/// Architecture:
/// ```text
///  .csv (UTF-8 / UTF-16)
///        │
///        ▼
///   ┌──────────┐
///   │ encoding  │  bytes → text
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ extract   │  positional schema → Vec<Series>
///   └──────────┘
/// ```

pub mod encoding;
pub mod extract;
pub mod loader;
pub mod model;
