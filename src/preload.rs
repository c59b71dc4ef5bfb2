//! Resource preload hints.
//!
//! [`ResourcePreloader`] keeps the set of active `<link rel="preload">`
//! hints. Each [`preload`](ResourcePreloader::preload) call returns a
//! [`PreloadHandle`] that removes exactly its own hint; duplicate hints for
//! the same URL and kind are allowed and tracked separately.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// The `as` attribute of a preload hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreloadKind {
    Script,
    Style,
    Image,
    Font,
    Fetch,
    Document,
}

impl PreloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
            Self::Image => "image",
            Self::Font => "font",
            Self::Fetch => "fetch",
            Self::Document => "document",
        }
    }

    /// Fonts and fetches are always requested in CORS mode, so their hints
    /// need `crossorigin` to be reused.
    #[inline]
    pub fn requires_crossorigin(self) -> bool {
        matches!(self, Self::Font | Self::Fetch)
    }
}

impl fmt::Display for PreloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreloadHint {
    id: u64,
    url: String,
    kind: PreloadKind,
}

impl PreloadHint {
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn kind(&self) -> PreloadKind {
        self.kind
    }

    /// Renders the hint as an HTTP `Link` header value.
    ///
    /// ```
    /// use perfkit::preload::{PreloadKind, ResourcePreloader};
    ///
    /// let preloader = ResourcePreloader::new();
    /// let _handle = preloader.preload("/fonts/inter.woff2", PreloadKind::Font);
    ///
    /// assert_eq!(
    ///     preloader.hints()[0].link_header(),
    ///     "</fonts/inter.woff2>; rel=preload; as=font; crossorigin"
    /// );
    /// ```
    pub fn link_header(&self) -> String {
        let mut header = format!("<{}>; rel=preload; as={}", self.url, self.kind);
        if self.kind.requires_crossorigin() {
            header.push_str("; crossorigin");
        }
        header
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    hints: Vec<PreloadHint>,
}

impl Registry {
    fn remove(&mut self, id: u64) -> bool {
        match self.hints.iter().position(|hint| hint.id == id) {
            Some(pos) => {
                self.hints.remove(pos);
                true
            },
            None => false,
        }
    }
}

/// Registry of active preload hints.
///
/// Clones share one registry.
#[derive(Debug, Clone, Default)]
pub struct ResourcePreloader {
    registry: Arc<Mutex<Registry>>,
}

impl ResourcePreloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hint for `url`. The hint stays registered until the
    /// returned handle is disposed or dropped.
    pub fn preload(&self, url: impl Into<String>, kind: PreloadKind) -> PreloadHandle {
        let url = url.into();
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id = registry.next_id.wrapping_add(1);

        log::debug!("registering preload hint #{id} for {url} as {kind}");
        registry.hints.push(PreloadHint { id, url, kind });

        PreloadHandle {
            registry: Arc::downgrade(&self.registry),
            id,
            disposed: false,
        }
    }

    /// Active hints in registration order.
    pub fn hints(&self) -> Vec<PreloadHint> {
        self.registry.lock().hints.clone()
    }

    pub fn len(&self) -> usize {
        self.registry.lock().hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.lock().hints.is_empty()
    }
}

/// Disposer for one registered hint.
///
/// Disposing more than once is a no-op. Dropping the handle disposes it.
#[must_use = "dropping the handle immediately removes the preload hint"]
#[derive(Debug)]
pub struct PreloadHandle {
    registry: Weak<Mutex<Registry>>,
    id: u64,
    disposed: bool,
}

impl PreloadHandle {
    /// Removes this handle's hint.
    ///
    /// Returns `true` only for the call that actually removed it.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;

        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = registry.lock().remove(self.id);
        if removed {
            log::debug!("removed preload hint #{}", self.id);
        }
        removed
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for PreloadHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
