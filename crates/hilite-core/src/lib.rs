//! Annotation engine: maps entity spans onto a time-aligned transcript and
//! turns the result into speaker-turn phrases ready for templating.
//!
//! Stages run in order: [`tokens`] -> [`apply`] -> [`markup`] -> [`merge`] ->
//! [`segment`], with [`rank`] running off the raw annotation set.
//! [`pipeline::annotate`] drives all of them.

pub mod apply;
pub mod error;
pub mod markup;
pub mod merge;
pub mod pipeline;
pub mod rank;
pub mod segment;
pub mod tokens;
pub mod types;

pub use error::{HiliteError, Result};
pub use pipeline::{
    annotate, AnnotatedTranscript, LegendEntry, PipelineOptions, UnknownEntityPolicy,
};
pub use rank::{ColorAssignment, Palette, RankedEntity};
pub use tokens::TokenStore;
pub use types::*;
