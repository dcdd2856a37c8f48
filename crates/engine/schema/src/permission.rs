use std::borrow::Cow;

use serde_json::Value;

use crate::ResolverContext;

/// Authorization check attached to a field, run before its resolver.
///
/// A denial nulls the field and adds an error with [Permission::message] to the response.
pub trait Permission: Send + Sync {
    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed("User is not authorized")
    }

    /// `source` is the parent value of the field.
    fn has_permission(&self, source: &Value, ctx: &ResolverContext) -> bool;
}

impl<F> Permission for F
where
    F: Fn(&Value, &ResolverContext) -> bool + Send + Sync,
{
    fn has_permission(&self, source: &Value, ctx: &ResolverContext) -> bool {
        self(source, ctx)
    }
}

impl std::fmt::Debug for dyn Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Permission").field("message", &self.message()).finish()
    }
}
