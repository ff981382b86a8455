pub mod current;
pub mod forecast;

pub use current::draw_current;
pub use forecast::draw_forecast;
