/// Limits enforced on every operation before execution. Unset means unlimited.
#[derive(Debug, Default, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OperationLimitsConfig {
    pub depth: Option<u16>,
    pub aliases: Option<u16>,
    pub root_fields: Option<u16>,
    /// Total number of fields, fragments included.
    pub complexity: Option<u16>,
}

impl OperationLimitsConfig {
    pub fn is_empty(&self) -> bool {
        *self == OperationLimitsConfig::default()
    }
}
