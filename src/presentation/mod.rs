mod render;
mod text;
pub mod view;

pub use render::render;
pub use text::format_dashboard;
pub use view::DashboardView;
