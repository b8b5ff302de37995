//! ignite-blog: a statically generated blog front-end for a headless CMS
//!
//! Posts are read from a Prismic-style content API, assembled together with
//! their neighbours and a read-time estimate, and rendered to HTML with
//! embedded Tera templates. A small axum server serves the generated pages,
//! generates unknown posts on demand and handles preview mode.

pub mod assembler;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod paths;
pub mod preview;
pub mod server;
pub mod source;
pub mod templates;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::source::ContentSource;

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// The content source described by the configuration
    pub fn source(&self) -> Result<Arc<dyn ContentSource>> {
        Ok(source::from_config(&self.config, &self.base_dir)?)
    }

    /// Pre-render every post
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
