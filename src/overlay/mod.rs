//! View reconciliation between host entity data and nameplate labels

mod reconciler;
mod view;

pub use reconciler::{Overlay, OverlayState};
pub use view::NameplateView;
