//! Word-embedding models for the Voynich manuscript and its English and
//! Spanish reference corpora, with persisted-artifact reuse.

pub mod config;
pub mod corpus;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod store;
