#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants used throughout the library.
pub mod constants;
/// Shared numeric primitives and guard helpers.
pub mod math;
/// Error types shared between submodules.
pub mod errors;
/// Two-port algebra, parameter bundles, and the component library.
pub mod network;
/// Frequency and component-value sweep descriptors and executors.
pub mod sweep;
/// Monte-Carlo tolerance analysis.
pub mod monte_carlo;
/// Smith-chart point generation with adaptive density.
pub mod smith;

/// Common exports for downstream crates.
pub mod prelude;
