/// Prefix of every generated preview id.
pub const PREVIEW_ID_PREFIX: &str = "entity-embed-";

/// Hands out preview ids for one editing session.
///
/// Ids are `entity-embed-0`, `entity-embed-1`, ... and never repeat within
/// the generator's lifetime, so two live widgets never share one.
#[derive(Debug, Default)]
pub struct PreviewIdGenerator {
    next: u64,
}

impl PreviewIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{PREVIEW_ID_PREFIX}{}", self.next);
        self.next += 1;
        id
    }

    /// How many ids have been issued.
    pub fn issued(&self) -> u64 {
        self.next
    }
}
