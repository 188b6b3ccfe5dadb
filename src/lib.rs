//! Helios - world map weather dashboard
//!
//! Pick a point on the map, fetch its forecast, render the metric cards and
//! a 24-hour projection chart. The library exposes the modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod controller;
pub mod effect;
pub mod geo;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod surface;
