//! Configuration module

mod site;

pub use site::ApiConfig;
pub use site::BuildConfig;
pub use site::FallbackPolicy;
pub use site::NavigationConfig;
pub use site::NeighborPolicy;
pub use site::PreviewConfig;
pub use site::ReadingConfig;
pub use site::SiteConfig;
