//! Image retrieval module
//!
//! Turns image URLs into decoded, opaque pixel data ready for text recognition.

mod fetcher;
mod normalize;

pub use fetcher::{decode_data_uri, ImageFetchError, ImageFetcher};
pub use normalize::{encode_png, flatten_onto_white, normalize};
