/// Chart layer: backend-neutral chart description and how it is assembled.
///
/// ```text
///   Vec<Series>
///        │
///        ▼
///   ┌──────────┐
///   │ compose   │  styles, axis ranges, legend blocks → Chart
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ annotate  │  callout at the row nearest a target x (paired plan)
///   └──────────┘
///        │
///        ▼
///   render::raster / ui::plot
/// ```

pub mod annotate;
pub mod compose;
pub mod grid;
pub mod model;
