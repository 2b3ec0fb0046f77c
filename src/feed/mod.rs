// =============================================================================
// Market Data Feed — the data-acquisition collaborator
// =============================================================================
//
// The analysis core never performs I/O; everything network-shaped lives
// here. The feed returns raw, possibly unordered and duplicate-bearing
// rows; cleaning them is the normalizer's job. Retry policy also belongs
// here (or above), never in the core.

pub mod client;

pub use client::FeedClient;
