//! perfkit: client-side performance primitives.
//!
//! Bounded LRU caching, virtual scroll windows, runtime metric sampling with
//! a low-performance classifier, debouncing, visibility-triggered lazy
//! loading and preload hints. See `DESIGN.md` for how the pieces fit.

pub mod builder;
pub mod cache;
pub mod clock;
pub mod context;
pub mod debounce;
pub mod error;
pub mod metrics;
pub mod preload;
pub mod visibility;
pub mod window;

pub mod prelude;
pub mod traits;
