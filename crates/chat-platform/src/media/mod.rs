pub mod blob;
pub mod capture;

pub use blob::BlobUrls;
pub use capture::BrowserAudioCapture;
