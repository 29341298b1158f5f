use tracing::debug;

use crate::directive::{directive, is_directive, query_command, SET_CURRENT, SET_DIR};
use crate::model::{CommandBatch, CurrentState, RewrittenBatch};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Leave out the injected `set.current(...)` when the user's first
    /// command already is one.
    pub skip_explicit_set_current: bool,
}

/// Build the batch that is actually submitted.
///
/// Order: `set.dir(...)` (only when dirs are known), `set.current(...)`,
/// the user's commands, then `get.current()`.
pub fn rewrite(batch: &CommandBatch, state: &CurrentState, opts: RewriteOptions) -> RewrittenBatch {
    let mut prelude = Vec::with_capacity(2);

    if !state.dirs.is_empty() {
        prelude.push(directive(SET_DIR, state.dirs.iter().map(|(k, v)| (k.as_str(), v.as_str()))));
    }

    let explicit = batch.first().map(|c| is_directive(c, SET_CURRENT)).unwrap_or(false);
    if opts.skip_explicit_set_current && explicit {
        debug!("first command is an explicit set.current; not injecting known files");
    } else {
        prelude.push(directive(SET_CURRENT, state.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))));
    }

    RewrittenBatch {
        prelude,
        user: batch.commands().to_vec(),
        query: query_command(),
    }
}
