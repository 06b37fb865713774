//! Responsive sizing for the portfolio cards.
//!
//! Designers specify card metrics at a handful of viewport widths; everything
//! in between is linearly interpolated. Label text switches between full and
//! abridged at a single width threshold.

pub mod config;
pub mod error;
pub mod interpolate;
pub mod resolver;
pub mod trace;

pub use config::{CardLabels, CardLayout, CardLayouts, LayoutConfig};
pub use error::LayoutError;
pub use interpolate::{interpolate, Breakpoint, BreakpointTable};
pub use resolver::{resolve_all, resolve_layout, resolve_layout_traced, LayoutDescriptor};
pub use trace::{LayoutTrace, NoopTrace, TracingTrace};
