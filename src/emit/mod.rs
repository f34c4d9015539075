pub mod header;
pub mod panel;

pub use header::{HeaderFlavor, HeaderOptions, render_header};
pub use panel::{PANEL_PRELUDE, render_panel};
