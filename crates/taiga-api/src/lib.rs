//! Provider adapters, listing aggregation, and the token broker.
//!
//! Each listing backend (AniList, Jikan, Kitsu) gets one adapter module that
//! translates its response schema into the canonical model from
//! `taiga-core`. The [`aggregator::Aggregator`] dispatches to whichever
//! adapter the user's configuration selects, and [`broker::TokenBroker`]
//! owns bearer-token exchange and storage for the providers that
//! authenticate.

pub mod aggregator;
pub mod anilist;
pub mod broker;
pub mod error;
pub mod jikan;
pub mod kitsu;
pub mod traits;

pub use aggregator::{Aggregator, ListingRequest, RetryPolicy};
pub use broker::{attach_auth, TokenBroker};
pub use error::{AggregateError, AuthError, FetchCause, FetchError};
pub use traits::{AiringWindow, AnimeSeason, MetadataProvider, PageQuery, Provider};
