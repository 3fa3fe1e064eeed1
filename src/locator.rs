//! Locator classification and the paste-handler registry.
//!
//! A locator is an opaque string naming where paste content lives,
//! scoped by a protocol prefix (`gist:abc123`), a full `http://...` URL,
//! or a bare local file path. Classification only splits and looks up;
//! it performs no I/O beyond checking whether a bare path is an existing
//! file.
//!
//! Handlers register themselves in an explicit [`HandlerRegistry`] built
//! once at startup and passed by reference, so tests can substitute
//! doubles and no global state is involved.

use std::collections::HashMap;
use std::io::Read;

use crate::error::{Error, Result};

/// Capability contract every paste backend exposes.
///
/// The core treats all backends uniformly through this trait; the
/// concrete HTTP shims live outside the core.
pub trait PasteHandler {
    /// The protocol prefix this handler claims, e.g. `gist`.
    fn prefix(&self) -> &str;

    /// Download the paste named by `locator` (the remainder after the
    /// prefix) as a byte stream.
    fn read_paste(&self, locator: &str) -> Result<Box<dyn Read>>;

    /// Upload a byte stream, returning the locator of the new paste.
    fn write_paste(&self, content: &mut dyn Read) -> Result<String>;
}

/// Registry mapping protocol prefixes to their handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn PasteHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own prefix.
    pub fn register(&mut self, handler: Box<dyn PasteHandler>) {
        self.handlers.insert(handler.prefix().to_string(), handler);
    }

    /// Look up the handler for a protocol prefix.
    pub fn handler(&self, protocol: &str) -> Result<&dyn PasteHandler> {
        self.handlers
            .get(protocol)
            .map(|h| h.as_ref())
            .ok_or_else(|| Error::UnrecognizedLocator(protocol.to_string()))
    }

    /// Classify a locator into `(protocol, remainder)`.
    ///
    /// `prefix:rest` is recognized when `prefix` is registered; `http`
    /// locators keep the full URL as the remainder. A locator without a
    /// recognized prefix that names an existing regular file classifies
    /// as `file`. Anything else fails with
    /// [`Error::UnrecognizedLocator`].
    pub fn classify(&self, locator: &str) -> Result<(String, String)> {
        let mut parts = locator.splitn(2, ':');
        if let (Some(prefix), Some(rest)) = (parts.next(), parts.next()) {
            if prefix == "http" {
                return Ok(("http".to_string(), locator.to_string()));
            }
            if self.handlers.contains_key(prefix) {
                return Ok((prefix.to_string(), rest.to_string()));
            }
        }

        match std::fs::metadata(locator) {
            Ok(meta) if meta.is_file() => Ok(("file".to_string(), locator.to_string())),
            _ => Err(Error::UnrecognizedLocator(locator.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct StubHandler {
        prefix: &'static str,
    }

    impl PasteHandler for StubHandler {
        fn prefix(&self) -> &str {
            self.prefix
        }

        fn read_paste(&self, _locator: &str) -> Result<Box<dyn Read>> {
            Ok(Box::new(std::io::empty()))
        }

        fn write_paste(&self, _content: &mut dyn Read) -> Result<String> {
            Ok(format!("{}:stub", self.prefix))
        }
    }

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register(Box::new(StubHandler { prefix: "gist" }));
        registry
    }

    #[test]
    fn test_registered_prefix() {
        let (protocol, rest) = registry().classify("gist:abc123").unwrap();
        assert_eq!(protocol, "gist");
        assert_eq!(rest, "abc123");
    }

    #[test]
    fn test_http_keeps_full_url() {
        let (protocol, rest) = registry().classify("http://example.com/p/1").unwrap();
        assert_eq!(protocol, "http");
        assert_eq!(rest, "http://example.com/p/1");
    }

    #[test]
    fn test_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paste.asc");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"data").unwrap();

        let locator = path.to_str().unwrap();
        let (protocol, rest) = registry().classify(locator).unwrap();
        assert_eq!(protocol, "file");
        assert_eq!(rest, locator);
    }

    #[test]
    fn test_directory_is_not_a_paste() {
        let dir = tempfile::tempdir().unwrap();
        let locator = dir.path().to_str().unwrap().to_string();
        assert!(matches!(
            registry().classify(&locator),
            Err(Error::UnrecognizedLocator(l)) if l == locator
        ));
    }

    #[test]
    fn test_unrecognized_prefix() {
        let result = registry().classify("nope:abc");
        assert!(matches!(result, Err(Error::UnrecognizedLocator(_))));
    }

    #[test]
    fn test_unknown_handler_lookup_fails() {
        assert!(registry().handler("pastebin").is_err());
    }
}
