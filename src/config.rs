//! Run configuration.

use crate::emit::Profile;
use crate::reader::DEFAULT_CHUNK_SIZE;
use crate::sink::DEFAULT_CAPACITY;

/// What to do with a document that yields no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyDocumentPolicy {
    /// Succeed with empty output (beyond the preamble)
    #[default]
    Accept,
    /// Fail the document with [`crate::ConvertError::NoRecords`]
    Reject,
}

/// Settings shared by every document of a run
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    /// Output buffer size; flushes happen in batches of about this many bytes
    pub output_capacity: usize,
    /// Bytes requested from the input per read
    pub read_chunk: usize,
    pub empty_document: EmptyDocumentPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            profile: Profile::default(),
            output_capacity: DEFAULT_CAPACITY,
            read_chunk: DEFAULT_CHUNK_SIZE,
            empty_document: EmptyDocumentPolicy::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_output_capacity(mut self, bytes: usize) -> Self {
        self.output_capacity = bytes;
        self
    }

    pub fn with_read_chunk(mut self, bytes: usize) -> Self {
        self.read_chunk = bytes;
        self
    }

    pub fn with_empty_document(mut self, policy: EmptyDocumentPolicy) -> Self {
        self.empty_document = policy;
        self
    }
}
