//! Visual layer traits
//!
//! Layers are drawn by the host; the core only decides when they exist and
//! what they show. A layer must tolerate `draw` being called repeatedly
//! with the same values.

use crate::state::BatteryState;

/// Handle to the window's root layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RootLayer(pub u32);

/// A layer that renders from the current time
pub trait FaceLayer {
    /// Allocate resources and attach under `root`
    fn create(&mut self, root: RootLayer);

    /// Render for the given wall-clock reading
    fn draw(&mut self, hour: u8, minute: u8);

    /// Release resources
    fn destroy(&mut self);
}

impl<T: FaceLayer + ?Sized> FaceLayer for &mut T {
    fn create(&mut self, root: RootLayer) {
        (**self).create(root)
    }

    fn draw(&mut self, hour: u8, minute: u8) {
        (**self).draw(hour, minute)
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}

/// The fixed set of face layers, visited in drawing order
pub trait LayerSet {
    /// Call `f` once for every layer
    fn for_each_layer(&mut self, f: &mut dyn FnMut(&mut dyn FaceLayer));
}

impl<L: FaceLayer, const N: usize> LayerSet for [L; N] {
    fn for_each_layer(&mut self, f: &mut dyn FnMut(&mut dyn FaceLayer)) {
        for layer in self.iter_mut() {
            f(layer);
        }
    }
}

impl<A: FaceLayer, B: FaceLayer, C: FaceLayer> LayerSet for (A, B, C) {
    fn for_each_layer(&mut self, f: &mut dyn FnMut(&mut dyn FaceLayer)) {
        f(&mut self.0);
        f(&mut self.1);
        f(&mut self.2);
    }
}

/// The notification text layer
pub trait MessageLayer {
    /// Materialise under `root`
    fn create(&mut self, root: RootLayer);

    /// Replace the shown text
    fn draw(&mut self, text: &str);

    /// Dematerialise
    fn destroy(&mut self);
}

/// Connectivity indicators
pub trait StatusLayer {
    /// Attach under `root`
    fn create(&mut self, root: RootLayer);

    /// Show the companion link state
    fn show_bluetooth(&mut self, connected: bool);

    /// Show the battery state
    fn show_battery(&mut self, battery: BatteryState);

    /// Detach
    fn destroy(&mut self);
}
