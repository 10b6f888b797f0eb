//! Fire growth modules: burn state, wavelet geometry, and the period loop

pub mod cache;
pub mod ellipse;
pub mod grid;
pub mod period;
pub mod provider;
pub mod status;
pub mod template;

pub use cache::IgnitionTemplateCache;
pub use ellipse::{EllipsePoint, FireEllipse};
pub use grid::{FireStateGrid, GridCensus, PeriodStats, DEFAULT_TEMPLATE_CAPACITY};
pub use period::Period;
pub use provider::{
    ConstantFireBehaviorProvider, ConstantFireInputProvider, FireBehavior, FireBehaviorProvider,
    FireInput, FireInputProvider,
};
pub use status::{BarrierKind, FireStatus};
pub use template::{Direction, IgnitionTemplate, OverlayStats};
