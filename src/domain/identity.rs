/// The base/table/record triple a history session is bound to. Any change
/// to one of the three starts a new session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordIdentity {
    pub base_id: String,
    pub table_id: String,
    pub record_id: String,
}

impl RecordIdentity {
    pub fn new(
        base_id: impl Into<String>,
        table_id: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self {
            base_id: base_id.into(),
            table_id: table_id.into(),
            record_id: record_id.into(),
        }
    }
}

impl std::fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.base_id, self.table_id, self.record_id)
    }
}
