pub mod app;
pub mod fonts;
pub mod reveal;
