/*!
 * # cliphub - self-contained video hub artifacts
 *
 * A Rust library that packages videos, subtitles and metadata into single
 * HTML documents that play offline and can be administered after delivery.
 *
 * ## Features
 *
 * - WebVTT cue parsing and serialization
 * - Single-media, channel and multi-channel hub exports
 * - Three hub layouts (netflix, youtube, custom)
 * - Public companion copies without an admin console
 * - Admin sessions that edit a delivered artifact and re-export it
 * - Optional AI metadata enrichment:
 *   - Anthropic API
 *   - Deterministic mock
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `cue_codec`: WEBVTT cue text
 * - `model`: Videos, channels and hubs, and their embedded JSON shape
 * - `generator`: Artifact rendering and the data contract
 * - `admin`: Admin patch protocol over delivered artifacts
 * - `providers`: Enrichment providers
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod admin;
pub mod app_config;
pub mod app_controller;
pub mod cue_codec;
pub mod errors;
pub mod file_utils;
pub mod generator;
pub mod model;
pub mod providers;

// Re-export main types for easier usage
pub use admin::{AdminSession, SaveMode, SessionState};
pub use app_config::Config;
pub use app_controller::{ArtifactSink, Controller, DirectorySink};
pub use cue_codec::Cue;
pub use errors::{AdminError, GenerationError, PatchError, ProviderError};
pub use generator::{ArtifactGenerator, GeneratedArtifact};
pub use model::{ChannelPackage, DesignVariant, HubDocument, MediaSource, MovieMetadata, VideoItem};
