//! # Reference Resolution
//!
//! A `$ref` token is either a structural pointer into the root schema of the
//! current validation call (`#`, `#/definitions/Address`) or an external id
//! looked up in the [`SchemaRegistry`]. External ids may carry a pointer
//! fragment (`address#/definitions/City`) that is walked inside the
//! registered document.
//!
//! Pointers always resolve against the root schema passed to the top-level
//! call, never against the schema node that contains the `$ref`.
//!
//! Resolution itself is stateless. Cycle detection belongs to the engine,
//! which threads a [`RefTrail`] down each recursion branch.

use serde_json::Value;

use crate::registry::SchemaRegistry;

/// Resolve `token` against `root` or `registry`. Returns `None` when a
/// pointer segment is missing, when the walk passes through a non-map
/// value, or when the id is not registered.
pub fn resolve<'s>(token: &str, root: &'s Value, registry: &'s SchemaRegistry) -> Option<&'s Value> {
    if let Some(pointer) = token.strip_prefix('#') {
        return walk_pointer(root, pointer);
    }
    match token.split_once('#') {
        Some((id, pointer)) => walk_pointer(registry.lookup(id)?, pointer),
        None => registry.lookup(token),
    }
}

/// Walk a pointer (the part after `#`) map by map. The empty pointer is the
/// document itself.
fn walk_pointer<'s>(document: &'s Value, pointer: &str) -> Option<&'s Value> {
    if pointer.is_empty() {
        return Some(document);
    }
    let rest = pointer.strip_prefix('/')?;
    rest.split('/').try_fold(document, |node, segment| {
        node.as_object()?.get(&unescape(segment))
    })
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// The `$ref` tokens being resolved on the current recursion branch.
///
/// Each `$ref` step creates a child trail that links to its parent; nothing
/// is ever mutated in place. Sibling branches (two properties, two `allOf`
/// members) hold their own links, so they never see each other's in-flight
/// references. Only an ancestor-to-descendant repeat is a cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefTrail<'t> {
    link: Option<(&'t str, &'t RefTrail<'t>)>,
}

impl<'t> RefTrail<'t> {
    /// The trail at the start of a top-level validation call.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `token` is already being resolved on this branch.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens().any(|t| t == token)
    }

    /// Fork this trail with `token` added.
    pub fn with<'u>(&'u self, token: &'u str) -> RefTrail<'u>
    where
        't: 'u,
    {
        RefTrail {
            link: Some((token, self)),
        }
    }

    /// Tokens on this branch, innermost first.
    pub fn tokens(&self) -> impl Iterator<Item = &'t str> + '_ {
        let mut current = self.link;
        std::iter::from_fn(move || {
            let (token, parent) = current?;
            current = parent.link;
            Some(token)
        })
    }
}
