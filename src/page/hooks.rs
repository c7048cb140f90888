//! Page load hooks.
//!
//! Handlers run once per loaded document, in registration order. Registering
//! a handler never replaces one registered earlier.

type Handler<D> = Box<dyn Fn(&mut D) + Send + Sync>;

/// Additive registry of "document loaded" handlers.
pub struct LoadHooks<D> {
    handlers: Vec<Handler<D>>,
}

impl<D> Default for LoadHooks<D> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<D> LoadHooks<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler.
    pub fn on_load<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Run every handler against a freshly loaded document.
    pub fn fire(&self, doc: &mut D) {
        for handler in &self.handlers {
            handler(doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fire_is_noop() {
        let hooks = LoadHooks::<Vec<&str>>::new();
        let mut doc = Vec::new();
        hooks.fire(&mut doc);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_registration_is_additive() {
        let mut hooks = LoadHooks::<Vec<&str>>::new();
        hooks
            .on_load(|doc| doc.push("host"))
            .on_load(|doc| doc.push("annotate"));

        let mut doc = Vec::new();
        hooks.fire(&mut doc);
        assert_eq!(doc, ["host", "annotate"]);
    }

    #[test]
    fn test_fire_per_document() {
        let mut hooks = LoadHooks::<u32>::new();
        hooks.on_load(|n| *n += 1);

        let mut a = 0;
        let mut b = 10;
        hooks.fire(&mut a);
        hooks.fire(&mut b);
        assert_eq!((a, b), (1, 11));
    }
}
