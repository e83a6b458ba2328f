//! Force-graph viewport: canvas rendering plus the pointer interaction model.

pub mod camera;
mod component;
pub mod highlight;
pub mod hit;
pub mod positions;
mod render;
pub mod state;
mod types;

pub use component::GraphCanvas;
pub use types::{ConnectMode, GraphData, GraphLink, LinkEnd, Node, NodeKind};
