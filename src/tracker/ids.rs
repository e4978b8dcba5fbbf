/// Source of fresh expense ids.
pub(crate) trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUIDv4 ids, hyphen-free.
#[derive(Debug, Default)]
pub(crate) struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<prefix><n>` ids.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct SequentialIds {
    prefix: String,
    next: u64,
}

#[cfg(test)]
impl SequentialIds {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

#[cfg(test)]
impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
