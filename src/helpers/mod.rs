//! Helper functions shared by the renderer and the server

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
