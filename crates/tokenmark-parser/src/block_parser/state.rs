//! Mutable tokenizer state plus the checkpoint and requeue machinery used to
//! roll back speculative link reference definitions.

use super::open_stack::OpenBlockStack;
use super::position::{LineFlags, SourceLine};
use super::reference_definitions::LinkDefinition;
use crate::options::ParserOptions;
use crate::token_stream::{TokenId, TokenMark, TokenStream};
use crate::tokens::MarkdownToken;

#[derive(Debug)]
pub(crate) struct ParserState {
    pub stack: OpenBlockStack,
    pub tokens: TokenStream,
    pub options: ParserOptions,
    /// Snapshot taken before the current line was processed.
    pub line_checkpoint: Checkpoint,
    /// One snapshot per line held by the pending link reference definition,
    /// each taken before that line was processed.
    pub definition_checkpoints: Vec<Checkpoint>,
}

/// Enough of the state to undo everything done since it was taken.
#[derive(Debug, Clone, Default)]
pub(crate) struct Checkpoint {
    token_count: usize,
    stack: OpenBlockStack,
    marks: Vec<(TokenId, TokenMark)>,
}

impl Checkpoint {
    pub fn token_count(&self) -> usize {
        self.token_count
    }
}

/// Instruction to undo work and feed lines through the tokenizer again.
#[derive(Debug)]
pub(crate) struct Requeue {
    pub restore: Checkpoint,
    /// Definition to emit, from the pending entry on the restored stack,
    /// before replaying `lines`.
    pub definition: Option<LinkDefinition>,
    /// Lines to process again, oldest first. The line being processed when
    /// the requeue was raised is not included.
    pub lines: Vec<SourceLine>,
    /// Overrides for the first replayed line.
    pub flags: LineFlags,
}

impl ParserState {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            stack: OpenBlockStack::default(),
            tokens: TokenStream::new(),
            options,
            line_checkpoint: Checkpoint::default(),
            definition_checkpoints: Vec::new(),
        }
    }

    pub fn emit(&mut self, token: MarkdownToken) -> TokenId {
        self.tokens.push(token)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            token_count: self.tokens.len(),
            stack: self.stack.clone(),
            marks: self
                .stack
                .open_tokens()
                .map(|id| (id, self.tokens.mark(id)))
                .collect(),
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        log::debug!(
            "restoring checkpoint: {} -> {} tokens, stack {:?}",
            self.tokens.len(),
            checkpoint.token_count,
            checkpoint.stack.describe()
        );
        for (id, mark) in &checkpoint.marks {
            self.tokens.rewind(*id, mark);
        }
        self.tokens.truncate(checkpoint.token_count);
        self.stack = checkpoint.stack;
        self.definition_checkpoints.clear();
    }
}
