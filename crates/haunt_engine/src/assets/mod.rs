//! Asset management system
//!
//! Textures and fonts are requested by path and resolve later, off the frame
//! cadence. A request immediately yields a typed handle; the
//! [`AssetServer`] reports completion through [`AssetServer::poll`], which the
//! frame loop drains once per frame.

pub mod font;
pub mod image_loader;
pub mod server;
pub mod source;

pub use font::{Font, Glyph};
pub use image_loader::ImageData;
pub use server::{AssetEvent, AssetServer, LoadMode, LoadState};
pub use source::{AssetSource, FileSource, MemorySource};

use thiserror::Error;

use crate::foundation::collections::TypedHandle;

/// Asset handle type
pub type AssetHandle<T> = TypedHandle<T>;

/// Handle to a raster texture
pub type TextureHandle = AssetHandle<ImageData>;

/// Handle to a font outline asset
pub type FontHandle = AssetHandle<Font>;

/// Asset trait for loadable resources
pub trait Asset: Send + 'static {
    /// Short name used in log messages
    const KIND: &'static str;

    /// Load asset from raw bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError>
    where
        Self: Sized;
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
