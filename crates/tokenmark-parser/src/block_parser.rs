//! Line-by-line block tokenizer.
//!
//! Each line runs through three stages: matching the containers that are
//! already open, opening new ones, and the leaf dispatcher. Any stage may
//! answer with a [`Requeue`](state::Requeue), which rolls the state back and
//! feeds lines through again.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

use crate::error::TokenizeError;
use crate::line_source::{LineSource, StrLineSource};
use crate::options::ParserOptions;
use crate::tokens::MarkdownToken;

mod blockquotes;
mod close_blocks;
mod code_blocks;
mod containers;
mod headings;
mod horizontal_rules;
mod html_blocks;
mod indented_code;
mod leaf_blocks;
mod lists;
mod open_stack;
mod position;
mod reference_definitions;
mod state;

use close_blocks::{Hooks, TokenStreamManager};
use containers::{match_open_containers, open_new_containers};
use leaf_blocks::{emit_definition, parse_leaf_block};
use open_stack::StackEntry;
use position::{LineContext, LineFlags, SourceLine};
use state::{ParserState, Requeue};

/// Converts documents into block token streams.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    options: ParserOptions,
}

impl Tokenizer {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn tokenize_str(&self, input: &str) -> Result<Vec<MarkdownToken>, TokenizeError> {
        self.tokenize_source(&mut StrLineSource::new(input))
    }

    /// Tokenize every line `source` produces.
    ///
    /// A violated internal invariant aborts the document and is reported as
    /// [`TokenizeError::Internal`] with the line and open blocks at the time.
    pub fn tokenize_source<S: LineSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<Vec<MarkdownToken>, TokenizeError> {
        let mut parser = DocumentParser::new(self.options.clone());
        match panic::catch_unwind(AssertUnwindSafe(|| parser.run(source))) {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                let error = parser.internal_error(message);
                log::error!("{}", error);
                Err(error)
            }
        }
    }
}

struct DocumentParser {
    state: ParserState,
    manager: TokenStreamManager,
    /// Lines to process before reading more from the source.
    pending: VecDeque<(SourceLine, LineFlags)>,
    lines_read: usize,
    current: Option<SourceLine>,
}

impl DocumentParser {
    fn new(options: ParserOptions) -> Self {
        Self {
            state: ParserState::new(options),
            manager: TokenStreamManager,
            pending: VecDeque::new(),
            lines_read: 0,
            current: None,
        }
    }

    fn run<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Vec<MarkdownToken>, TokenizeError> {
        log::debug!("starting document");
        loop {
            while let Some((line, flags)) = self.next_line(source)? {
                self.process_line(line, flags);
            }

            // Closing at the end of the document can still requeue a pending
            // definition's lines.
            self.current = None;
            let manager = self.manager;
            match manager.hooks().closer.close_open_blocks(&mut self.state, 1) {
                Ok(()) => break,
                Err(requeue) => self.apply_requeue(requeue, None),
            }
        }

        let tokens = std::mem::take(&mut self.state.tokens).into_vec();
        log::debug!(
            "finished document: {} lines, {} tokens",
            self.lines_read,
            tokens.len()
        );
        Ok(tokens)
    }

    fn next_line<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Option<(SourceLine, LineFlags)>, TokenizeError> {
        if let Some(queued) = self.pending.pop_front() {
            return Ok(Some(queued));
        }
        let Some(text) = source.next_line()? else {
            return Ok(None);
        };
        self.lines_read += 1;
        let line = SourceLine {
            number: self.lines_read,
            text,
        };
        Ok(Some((line, LineFlags::default())))
    }

    fn process_line(&mut self, line: SourceLine, flags: LineFlags) {
        log::trace!("line {}: {:?} {:?}", line.number, line.text, flags);
        self.current = Some(line.clone());
        self.state.line_checkpoint = self.state.checkpoint();

        let manager = self.manager;
        let result = {
            let mut ctx = LineContext::new(&line, flags);
            parse_line(&mut self.state, &mut ctx, manager.hooks())
        };
        if let Err(requeue) = result {
            self.apply_requeue(requeue, Some(line));
        }
    }

    fn apply_requeue(&mut self, requeue: Requeue, current: Option<SourceLine>) {
        let Requeue {
            restore,
            definition,
            lines,
            flags,
        } = requeue;
        log::debug!(
            "requeue: rolling back to {} tokens, replaying {} line(s)",
            restore.token_count(),
            lines.len() + usize::from(current.is_some())
        );

        self.state.restore(restore);
        if let Some(definition) = definition {
            let StackEntry::LinkDefinition(pending) = self.state.stack.pop() else {
                panic!("requeued definition has no pending entry");
            };
            emit_definition(&mut self.state, pending, definition);
        }

        let replay = lines.into_iter().chain(current);
        let queued: Vec<_> = replay
            .enumerate()
            .map(|(i, line)| {
                let line_flags = if i == 0 { flags } else { LineFlags::default() };
                (line, line_flags)
            })
            .collect();
        for entry in queued.into_iter().rev() {
            self.pending.push_front(entry);
        }
    }

    fn internal_error(&self, message: String) -> TokenizeError {
        let (line_number, line) = self
            .current
            .as_ref()
            .map_or((self.lines_read, String::new()), |l| {
                (l.number, l.text.clone())
            });
        TokenizeError::Internal {
            message,
            line_number,
            line,
            stack: self.state.stack.describe(),
        }
    }
}

fn parse_line(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    match_open_containers(state, ctx);
    open_new_containers(state, ctx, hooks, 0)?;
    parse_leaf_block(state, ctx, hooks)?;
    ctx.commit_prefixes(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    mod blockquotes;
    mod code_blocks;
    mod errors;
    mod headings;
    pub(crate) mod helpers;
    mod html;
    mod lists;
    mod losslessness;
    mod reference_definitions;
    mod scenarios;
}
