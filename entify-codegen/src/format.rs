//! Source formatting applied to rendered templates before they are written.

use std::{
    collections::HashMap,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
};

use thiserror::Error;

use crate::GO_NAMING;

/// Error from a formatting pass.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: unexpected '{found}'")]
    Unbalanced { line: usize, found: char },

    #[error("line {line}: '{open}' is never closed")]
    Unclosed { line: usize, open: char },

    #[error("line {line}: unterminated {what}")]
    Unterminated { line: usize, what: &'static str },

    #[error("line {line}: '{name}' is not a valid identifier")]
    InvalidIdentifier { line: usize, name: String },

    #[error("line {line}: '{name}' redeclared in {scope}")]
    Redeclared {
        line: usize,
        name: String,
        scope: String,
    },

    #[error("line {line}: malformed import spec")]
    Import { line: usize },

    #[error("failed to run gofmt")]
    Spawn(#[source] io::Error),

    #[error("gofmt: {0}")]
    Gofmt(String),
}

/// A pass over rendered source text.
pub trait SourceFormatter: Send + Sync {
    /// The formatter name, used in logs.
    fn name(&self) -> &'static str;

    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// In-process Go formatter.
///
/// Checks that delimiters balance and that strings, runes and comments are
/// terminated, then re-indents with tabs by nesting depth. Switch `case` and
/// `default` labels sit one level out. Trailing whitespace is trimmed, blank
/// runs collapse to one line, blank lines right after an opening or before a
/// closing delimiter are dropped and the output ends with a single newline.
/// Raw string contents are left untouched.
///
/// Import blocks are sorted and de-duplicated within each blank-line
/// separated group. Declared names (package, types, struct fields, methods,
/// functions, constants and variables) must be identifiers and unique in
/// their scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    BlockComment,
    RawString,
}

struct Open {
    delim: char,
    indent: usize,
    line: usize,
}

/// An output line with the source line it came from.
struct Line {
    text: String,
    origin: usize,
    /// False for lines inside a raw string or block comment.
    code: bool,
}

impl Line {
    fn new(text: String, origin: usize, code: bool) -> Self {
        Self { text, origin, code }
    }

    fn indent(&self) -> usize {
        self.text.bytes().take_while(|b| *b == b'\t').count()
    }

    fn body(&self) -> &str {
        self.text.trim_start_matches('\t')
    }
}

impl SourceFormatter for GoFormatter {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut out: Vec<Line> = Vec::new();
        let mut stack: Vec<Open> = Vec::new();
        let mut state = State::Code;
        let mut pending_blank = false;
        let mut raw_start = 0;
        let mut comment_start = 0;
        let mut last_indent = 0;

        for (idx, raw_line) in source.lines().enumerate() {
            let line_no = idx + 1;

            if state == State::RawString {
                if let Some(close) = scan_raw(raw_line, 0) {
                    state = scan(&raw_line[close..], line_no, last_indent, &mut stack)?;
                    mark_open(state, line_no, &mut raw_start, &mut comment_start);
                }
                out.push(Line::new(raw_line.to_string(), line_no, false));
                continue;
            }

            let trimmed = raw_line.trim();
            if trimmed.is_empty() && state == State::Code {
                pending_blank = true;
                continue;
            }

            let indent = if state == State::BlockComment {
                stack.last().map_or(0, |o| o.indent + 1)
            } else {
                line_indent(trimmed, &stack)
            };

            if pending_blank {
                let after_open = out
                    .last()
                    .is_some_and(|prev| prev.text.ends_with(['{', '(', '[']));
                let before_close = trimmed.starts_with(['}', ')', ']']);
                if !out.is_empty() && !after_open && !before_close {
                    out.push(Line::new(String::new(), line_no, true));
                }
                pending_blank = false;
            }

            let code = state == State::Code;
            if state == State::BlockComment {
                if let Some(end) = trimmed.find("*/") {
                    state = scan(&trimmed[end + 2..], line_no, indent, &mut stack)?;
                    mark_open(state, line_no, &mut raw_start, &mut comment_start);
                }
            } else {
                state = scan(trimmed, line_no, indent, &mut stack)?;
                mark_open(state, line_no, &mut raw_start, &mut comment_start);
            }

            last_indent = indent;
            out.push(Line::new(
                format!("{}{}", "\t".repeat(indent), trimmed),
                line_no,
                code,
            ));
        }

        match state {
            State::RawString => {
                return Err(FormatError::Unterminated {
                    line: raw_start,
                    what: "raw string",
                });
            }
            State::BlockComment => {
                return Err(FormatError::Unterminated {
                    line: comment_start,
                    what: "comment",
                });
            }
            State::Code => {}
        }

        if let Some(open) = stack.last() {
            return Err(FormatError::Unclosed {
                line: open.line,
                open: open.delim,
            });
        }

        sort_imports(&mut out)?;
        check_declarations(&out)?;

        let mut formatted = out
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        formatted.push('\n');
        Ok(formatted)
    }
}

/// Remember where a raw string or block comment left open by a line began.
fn mark_open(state: State, line: usize, raw_start: &mut usize, comment_start: &mut usize) {
    match state {
        State::RawString => *raw_start = line,
        State::BlockComment => *comment_start = line,
        State::Code => {}
    }
}

/// Indentation of a line given the delimiters open before it.
fn line_indent(trimmed: &str, stack: &[Open]) -> usize {
    let closers = trimmed
        .chars()
        .take_while(|c| matches!(c, ')' | ']' | '}'))
        .count();
    let remaining = stack.len().saturating_sub(closers);

    let indent = if closers > 0 {
        stack.get(remaining).map_or(0, |o| o.indent)
    } else if remaining == 0 {
        0
    } else {
        stack[remaining - 1].indent + 1
    };

    if is_label(trimmed) {
        indent.saturating_sub(1)
    } else {
        indent
    }
}

fn is_label(trimmed: &str) -> bool {
    (trimmed.starts_with("case ") && trimmed.ends_with(':')) || trimmed == "default:"
}

/// Find the closing backtick of a raw string starting at `from`.
fn scan_raw(line: &str, from: usize) -> Option<usize> {
    line[from..].find('`').map(|i| from + i + 1)
}

/// Scan code text, updating the delimiter stack.
///
/// Returns the state the line ends in.
fn scan(text: &str, line: usize, indent: usize, stack: &mut Vec<Open>) -> Result<State, FormatError> {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => return Ok(State::Code),
            b'/' if bytes.get(i + 1) == Some(&b'*') => match text[i + 2..].find("*/") {
                Some(end) => i += 2 + end + 2,
                None => return Ok(State::BlockComment),
            },
            quote @ (b'"' | b'\'') => {
                i = skip_quoted(bytes, i + 1, quote).ok_or(FormatError::Unterminated {
                    line,
                    what: if quote == b'"' { "string" } else { "rune" },
                })?;
            }
            b'`' => match scan_raw(text, i + 1) {
                Some(next) => i = next,
                None => return Ok(State::RawString),
            },
            open @ (b'(' | b'[' | b'{') => {
                stack.push(Open {
                    delim: open as char,
                    indent,
                    line,
                });
                i += 1;
            }
            close @ (b')' | b']' | b'}') => {
                let expected = match close {
                    b')' => '(',
                    b']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some(open) if open.delim == expected => {}
                    _ => {
                        return Err(FormatError::Unbalanced {
                            line,
                            found: close as char,
                        });
                    }
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    Ok(State::Code)
}

/// Skip past an interpreted string or rune body; returns the index after the
/// closing quote.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Sort the specs of every `import ( ... )` block, group by group.
fn sort_imports(lines: &mut Vec<Line>) -> Result<(), FormatError> {
    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        let import = (line.code && line.indent() == 0)
            .then(|| line.text.strip_prefix("import "))
            .flatten();
        match import {
            Some("(") => {}
            Some(spec) => {
                parse_import(spec, line.origin)?;
                i += 1;
                continue;
            }
            None => {
                i += 1;
                continue;
            }
        }

        let start = i + 1;
        let end = lines[start..]
            .iter()
            .position(|line| line.code && line.text == ")")
            .map_or(lines.len(), |offset| start + offset);

        let mut group_start = start;
        let mut sorted: Vec<Line> = Vec::with_capacity(end - start);
        for idx in start..=end {
            if idx < end && !lines[idx].text.is_empty() {
                continue;
            }
            sorted.extend(sort_group(&lines[group_start..idx])?);
            if idx < end {
                sorted.push(Line::new(String::new(), lines[idx].origin, true));
            }
            group_start = idx + 1;
        }

        let next = start + sorted.len() + 1;
        let tail = lines.split_off(end);
        lines.truncate(start);
        lines.extend(sorted);
        lines.extend(tail);
        i = next;
    }
    Ok(())
}

/// Sort one group of import specs by path, dropping exact duplicates.
/// Groups holding comments are kept as they are.
fn sort_group(group: &[Line]) -> Result<Vec<Line>, FormatError> {
    if group.iter().any(|line| !line.code || line.body().starts_with("//")) {
        return Ok(group
            .iter()
            .map(|line| Line::new(line.text.clone(), line.origin, line.code))
            .collect());
    }

    let mut specs = Vec::with_capacity(group.len());
    for line in group {
        let (alias, path) = parse_import(line.body(), line.origin)?;
        specs.push((path.to_string(), alias.map(str::to_string), line));
    }
    specs.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
    specs.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);

    Ok(specs
        .into_iter()
        .map(|(_, _, line)| Line::new(line.text.clone(), line.origin, true))
        .collect())
}

/// Split an import spec into its optional alias and quoted path.
fn parse_import(spec: &str, line: usize) -> Result<(Option<&str>, &str), FormatError> {
    let (alias, path) = match spec.split_once(char::is_whitespace) {
        Some((alias, path)) => (Some(alias), path.trim()),
        None => (None, spec),
    };
    let quoted = path.len() >= 2
        && ((path.starts_with('"') && path.ends_with('"'))
            || (path.starts_with('`') && path.ends_with('`')));
    let alias_ok = alias.is_none_or(|alias| alias == "." || alias == "_" || is_identifier(alias));
    if !quoted || !alias_ok || path[1..path.len() - 1].is_empty() {
        return Err(FormatError::Import { line });
    }
    Ok((alias, &path[1..path.len() - 1]))
}

/// Whether `name` is a Go identifier that is not a keyword.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic());
    head_ok && chars.all(|c| c == '_' || c.is_alphanumeric()) && !GO_NAMING.is_reserved(name)
}

/// The leading identifier-like token of `text`.
fn leading_name(text: &str) -> &str {
    let end = text
        .find(|c: char| c.is_whitespace() || matches!(c, '(' | '[' | '=' | ',' | '{' | ';'))
        .unwrap_or(text.len());
    &text[..end]
}

/// Declared names and the line each was first seen on.
#[derive(Default)]
struct Declarations {
    package: HashMap<String, usize>,
    members: HashMap<String, HashMap<String, usize>>,
}

impl Declarations {
    fn declare(&mut self, owner: Option<&str>, name: &str, line: usize) -> Result<(), FormatError> {
        if !is_identifier(name) {
            return Err(FormatError::InvalidIdentifier {
                line,
                name: name.to_string(),
            });
        }
        if name == "_" || (owner.is_none() && name == "init") {
            return Ok(());
        }
        let (scope, label) = match owner {
            Some(owner) => (
                self.members.entry(owner.to_string()).or_default(),
                format!("type {owner}"),
            ),
            None => (&mut self.package, "the package".to_string()),
        };
        if scope.insert(name.to_string(), line).is_some() {
            return Err(FormatError::Redeclared {
                line,
                name: name.to_string(),
                scope: label,
            });
        }
        Ok(())
    }
}

/// Check the names declared at the top level of a file.
fn check_declarations(lines: &[Line]) -> Result<(), FormatError> {
    let mut decls = Declarations::default();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        i += 1;
        if !line.code || line.indent() != 0 {
            continue;
        }
        let text = line.text.as_str();

        if let Some(rest) = text.strip_prefix("package ") {
            let name = rest.trim();
            if !is_identifier(name) {
                return Err(FormatError::InvalidIdentifier {
                    line: line.origin,
                    name: name.to_string(),
                });
            }
        } else if let Some(rest) = text.strip_prefix("type ") {
            if rest == "(" {
                continue;
            }
            let name = leading_name(rest);
            decls.declare(None, name, line.origin)?;
            if rest[name.len()..].trim_start().starts_with("struct {") && !text.ends_with('}') {
                i = struct_fields(lines, i, name, &mut decls)?;
            }
        } else if let Some(rest) = text.strip_prefix("func ") {
            func_name(rest, line.origin, &mut decls)?;
        } else if let Some(rest) = text
            .strip_prefix("const ")
            .or_else(|| text.strip_prefix("var "))
        {
            if rest == "(" {
                i = value_block(lines, i, &mut decls)?;
            } else {
                value_names(rest, line.origin, &mut decls)?;
            }
        }
    }
    Ok(())
}

/// Whether a line inside a declaration block starts a new entry.
fn declares(body: &str) -> bool {
    !body.is_empty() && !body.starts_with("//") && !body.starts_with(['}', ')', ']'])
}

/// Declare the fields of the struct body starting at `start`; returns the
/// index after its closing line.
fn struct_fields(
    lines: &[Line],
    start: usize,
    owner: &str,
    decls: &mut Declarations,
) -> Result<usize, FormatError> {
    let mut i = start;
    while let Some(line) = lines.get(i) {
        i += 1;
        if line.code && line.indent() == 0 && line.text.starts_with('}') {
            break;
        }
        let body = line.body();
        if !line.code || line.indent() != 1 || !declares(body) {
            continue;
        }

        let tokens: Vec<&str> = body.split_whitespace().collect();
        if tokens.len() == 1 || tokens[1].starts_with('`') {
            // embedded: the field is named after the type
            let ty = tokens[0].trim_start_matches('*');
            let name = ty.rsplit('.').next().unwrap_or(ty);
            decls.declare(Some(owner), name, line.origin)?;
            continue;
        }
        for token in tokens.iter().take_while(|t| t.ends_with(',')) {
            decls.declare(Some(owner), token.trim_end_matches(','), line.origin)?;
        }
        let last = tokens.iter().find(|t| !t.ends_with(',')).copied().unwrap_or_default();
        decls.declare(Some(owner), last, line.origin)?;
    }
    Ok(i)
}

/// Declare a function, or a method on its receiver type.
fn func_name(rest: &str, line: usize, decls: &mut Declarations) -> Result<(), FormatError> {
    let Some(receiver) = rest.strip_prefix('(') else {
        return decls.declare(None, leading_name(rest), line);
    };
    let Some(close) = receiver.find(')') else {
        return Err(FormatError::InvalidIdentifier {
            line,
            name: rest.to_string(),
        });
    };

    let tokens: Vec<&str> = receiver[..close].split_whitespace().collect();
    if let [name, _] = tokens.as_slice() {
        if !is_identifier(name) {
            return Err(FormatError::InvalidIdentifier {
                line,
                name: name.to_string(),
            });
        }
    }
    let owner = tokens.last().copied().unwrap_or_default().trim_start_matches('*');
    let owner = owner.split('[').next().unwrap_or(owner);
    decls.declare(Some(owner), leading_name(receiver[close + 1..].trim_start()), line)
}

/// Declare the entries of a `const (` or `var (` block starting at `start`;
/// returns the index after its closing line.
fn value_block(lines: &[Line], start: usize, decls: &mut Declarations) -> Result<usize, FormatError> {
    let mut i = start;
    while let Some(line) = lines.get(i) {
        i += 1;
        if line.code && line.indent() == 0 && line.text.starts_with(')') {
            break;
        }
        let body = line.body();
        if line.code && line.indent() == 1 && declares(body) {
            value_names(body, line.origin, decls)?;
        }
    }
    Ok(i)
}

/// Declare the names of a single constant or variable spec.
fn value_names(spec: &str, line: usize, decls: &mut Declarations) -> Result<(), FormatError> {
    let names = spec.split('=').next().unwrap_or(spec);
    for part in names.split(',') {
        let name = part.split_whitespace().next().unwrap_or_default();
        decls.declare(None, name, line)?;
    }
    Ok(())
}

/// Formatter piping source through the external `gofmt` binary.
#[derive(Debug, Clone)]
pub struct Gofmt {
    program: PathBuf,
}

impl Gofmt {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Gofmt {
    fn default() -> Self {
        Self::new("gofmt")
    }
}

impl SourceFormatter for Gofmt {
    fn name(&self) -> &'static str {
        "gofmt"
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(FormatError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(FormatError::Spawn)?;
        }

        let output = child.wait_with_output().map_err(FormatError::Spawn)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormatError::Gofmt(stderr.trim().to_string()));
        }

        String::from_utf8(output.stdout).map_err(|err| FormatError::Gofmt(err.to_string()))
    }
}
