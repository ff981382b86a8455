pub mod header;
pub mod status_bar;
pub mod utils;

pub use header::draw_header;
pub use status_bar::draw_status_bar;
pub use utils::{icon_glyph, temperature_color, truncate};
