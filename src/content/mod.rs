//! Content module - the post display model and its derived values

mod normalize;
mod post;
pub mod reading;
mod richtext;

pub use normalize::{nav_link, normalize_post};
pub use post::{NavLink, Navigation, Post, PostView, RichTextBlock, Section};
pub use richtext::{HtmlSerializer, RichTextRenderer};
