/*!
 * Error types for the cliphub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with enrichment provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider cannot produce this kind of payload
    #[error("Provider does not support {0}")]
    Unsupported(String),
}

/// Errors that abort artifact generation before anything is delivered
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Single-media export without a media file
    #[error("No media selected for export")]
    NoMedia,

    /// Channel export with no videos
    #[error("Channel '{name}' has no videos")]
    EmptyChannel {
        /// Channel display name
        name: String,
    },

    /// Hub export with no channels, or with only empty channels
    #[error("Hub has no content: add at least one channel with videos")]
    EmptyHub,

    /// A media payload could not be read
    #[error("Failed to read media {path}: {message}")]
    MediaRead {
        /// Path or label of the media source
        path: String,
        /// Underlying failure
        message: String,
    },

    /// The data segment could not be serialized
    #[error("Failed to serialize document data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The rendered artifact does not satisfy the marker/secret contract
    #[error("Generated artifact violates the data contract: {0}")]
    ContractViolation(String),
}

/// Errors raised while re-serializing an existing artifact
#[derive(Error, Debug)]
pub enum PatchError {
    /// A marker occurs zero or several times
    #[error("Structural error: marker '{marker}' found {found} time(s), expected exactly once")]
    MarkerCount {
        /// The literal marker text
        marker: &'static str,
        /// Number of occurrences found
        found: usize,
    },

    /// The end marker precedes the start marker
    #[error("Structural error: data end marker precedes data start marker")]
    MarkersOutOfOrder,

    /// The text between the markers is not a `const data = ...;` binding
    #[error("Structural error: data segment is not a single data binding")]
    MalformedDataSegment,

    /// No secret assignment statement was found
    #[error("Structural error: secret assignment not found")]
    SecretLiteralNotFound,

    /// The data segment does not decode to the expected document shape
    #[error("Data segment is not valid document JSON: {0}")]
    InvalidData(#[from] serde_json::Error),
}

/// Errors raised by an admin session
#[derive(Error, Debug)]
pub enum AdminError {
    /// Operation attempted while the console is locked
    #[error("Admin console is locked")]
    Locked,

    /// The supplied secret was rejected
    #[error("Incorrect secret")]
    AccessDenied,

    /// The artifact has no admin entry point (empty secret)
    #[error("This artifact has no admin console")]
    ConsoleUnavailable,

    /// The session already produced its artifact
    #[error("Admin session has ended")]
    SessionEnded,

    /// Channel index out of range
    #[error("Channel {0} not found")]
    ChannelNotFound(usize),

    /// Video index out of range within a channel
    #[error("Video {video} not found in channel {channel}")]
    VideoNotFound {
        /// Channel index
        channel: usize,
        /// Video index
        video: usize,
    },

    /// A media file added from the console could not be read
    #[error("Failed to read media {path}: {message}")]
    MediaRead {
        /// Path of the media file
        path: String,
        /// Underlying failure
        message: String,
    },

    /// Operation not offered by this artifact's admin menu
    #[error("Operation '{0}' is not available for this artifact")]
    UnsupportedOperation(&'static str),

    /// Re-serialization failed
    #[error("Save aborted: {0}")]
    Patch(#[from] PatchError),

    /// Serializing the live store failed
    #[error("Failed to serialize live data: {0}")]
    Serialization(#[from] serde_json::Error),
}
