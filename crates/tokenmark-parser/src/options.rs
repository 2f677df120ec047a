/// Options controlling the block tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserOptions {
    /// Upper bound on the number of simultaneously open container blocks.
    /// Container markers beyond this depth are treated as leaf content.
    pub max_container_depth: usize,
}

pub const DEFAULT_MAX_CONTAINER_DEPTH: usize = 64;

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_container_depth: DEFAULT_MAX_CONTAINER_DEPTH,
        }
    }
}
