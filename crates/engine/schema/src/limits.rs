/// Bounds checked on every operation before it's bound to the schema. `None` means unlimited.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationLimits {
    /// Deepest nesting of selection sets, fragments included.
    pub depth: Option<u16>,
    /// Total number of aliased fields.
    pub aliases: Option<u16>,
    /// Number of root fields, each alias counted.
    pub root_fields: Option<u16>,
    /// Total number of fields.
    pub complexity: Option<u16>,
}

impl OperationLimits {
    pub fn is_unlimited(&self) -> bool {
        *self == OperationLimits::default()
    }
}
