//! Synthetic identifier allocation

/// Allocator of collision-free synthetic identifiers
///
/// Produces `__{base}{n}__`. Source identifiers may not begin with `_`, so
/// these never collide with user names; `n` only grows, so two identifiers
/// from one allocator never collide with each other. Share one allocator
/// across every unit that ends up in the same program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gensym {
    counter: u64,
}

impl Gensym {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh identifier derived from `base`
    pub fn fresh(&mut self, base: &str) -> String {
        self.counter += 1;
        let name = format!("__{}{}__", base, self.counter);
        tracing::trace!(name = %name, "gensym");
        name
    }

    /// Number of identifiers allocated so far
    pub fn count(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_unique_and_ordered() {
        let mut gensym = Gensym::new();
        assert_eq!(gensym.fresh("obj"), "__obj1__");
        assert_eq!(gensym.fresh("obj"), "__obj2__");
        assert_eq!(gensym.fresh(""), "__3__");
        assert_eq!(gensym.count(), 3);
    }
}
