//! Drawing surfaces and the components that own instances bound to them
//!
//! A [`DrawingSurface`] is a terminal region that becomes *mounted* once
//! layout gives it an area. Components bind an instance to it and must
//! release that binding when the instance is destroyed, so the surface
//! itself records whether something is still attached.

pub mod chart;
pub mod geo;

use ratatui::layout::Rect;

pub use chart::{ChartInstance, ChartStyle, ChartSurface};
pub use geo::{GeoSurface, GeoSurfaceProps, InitOutcome, MapDetail, MapInstance, MapLayer, MapView};

/// Identifies one instance bound to a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

#[derive(Debug, Default)]
pub struct DrawingSurface {
    area: Option<Rect>,
    bindings: Vec<InstanceId>,
    next_id: u64,
}

impl DrawingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the surface an area. An empty area leaves it unmounted.
    pub fn mount(&mut self, area: Rect) {
        self.area = (!area.is_empty()).then_some(area);
    }

    pub fn unmount(&mut self) {
        self.area = None;
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn is_mounted(&self) -> bool {
        self.area.is_some()
    }

    /// Whether any instance is still attached.
    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn bind(&mut self) -> InstanceId {
        self.next_id += 1;
        let id = InstanceId(self.next_id);
        self.bindings.push(id);
        id
    }

    /// Detach `id`. Returns false if it was not bound here.
    pub fn release(&mut self, id: InstanceId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|bound| *bound != id);
        self.bindings.len() != before
    }
}
