use crate::history::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub history_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
