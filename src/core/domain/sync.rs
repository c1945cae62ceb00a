/// Result of importing a sync envelope.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Keys written to the backend
    pub imported: Vec<String>,
    /// Keys left alone because the backend already had them
    pub skipped: Vec<String>,
}

impl SyncReport {
    /// Total keys in the envelope.
    pub fn total(&self) -> usize {
        self.imported.len() + self.skipped.len()
    }
}
