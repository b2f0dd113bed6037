pub mod handlebars;
pub mod jinja;
#[cfg(feature = "storage")]
pub mod session;

pub use self::handlebars::HandlebarsRenderer;
pub use jinja::JinjaRenderer;
#[cfg(feature = "storage")]
pub use session::*;
