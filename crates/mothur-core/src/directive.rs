//! Batch-mode directive syntax understood by mothur.
//!
//! A batch is a single argument of the form
//! `#set.logfile(name=<file>); cmd(arg=val, ...); ...`.

/// Prefix mothur writes in front of every echoed command.
pub const PROMPT: &str = "mothur > ";

pub const SET_CURRENT: &str = "set.current";
pub const SET_DIR: &str = "set.dir";
pub const GET_CURRENT: &str = "get.current";
pub const SET_LOGFILE: &str = "set.logfile";

pub const SEPARATOR: &str = "; ";

const NO_ARGS: [(&str, &str); 0] = [];

/// Format `name(k=v, k=v)`.
pub fn directive<'a, I>(name: &str, args: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let args: Vec<String> = args.into_iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}({})", name, args.join(", "))
}

/// The state-query command appended to every batch.
pub fn query_command() -> String {
    directive(GET_CURRENT, NO_ARGS)
}

pub fn logfile_command(name: &str) -> String {
    directive(SET_LOGFILE, [("name", name)])
}

/// True when `command` is a call of directive `name`, e.g. `set.current(fasta=x)`.
pub fn is_directive(command: &str, name: &str) -> bool {
    command
        .trim_start()
        .strip_prefix(name)
        .map(|rest| rest.trim_start().starts_with('('))
        .unwrap_or(false)
}

/// Join commands into the single inline command-file argument.
pub fn batch_argument(logfile: &str, commands: &[String]) -> String {
    let mut parts = Vec::with_capacity(commands.len() + 1);
    parts.push(logfile_command(logfile));
    parts.extend(commands.iter().cloned());
    format!("#{}", parts.join(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_directives() {
        assert_eq!(directive(SET_CURRENT, [("fasta", "a.fa"), ("name", "a.names")]), "set.current(fasta=a.fa, name=a.names)");
        assert_eq!(directive(SET_CURRENT, NO_ARGS), "set.current()");
        assert_eq!(query_command(), "get.current()");
    }

    #[test]
    fn recognises_directive_calls() {
        assert!(is_directive("set.current(fasta=x)", SET_CURRENT));
        assert!(is_directive("  set.current (fasta=x)", SET_CURRENT));
        assert!(!is_directive("set.currently()", SET_CURRENT));
        assert!(!is_directive("get.current()", SET_CURRENT));
    }

    #[test]
    fn batch_argument_leads_with_logfile() {
        let arg = batch_argument("mothur.ipython.12345.logfile", &["help()".to_string(), "get.current()".to_string()]);
        assert_eq!(arg, "#set.logfile(name=mothur.ipython.12345.logfile); help(); get.current()");
    }
}
