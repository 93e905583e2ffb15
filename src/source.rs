// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Rc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp;
use core::fmt::{self, Debug, Formatter};

struct SourceInternal {
    name: String,
    contents: String,
    lines: Vec<(usize, usize)>,
}

/// Expression text kept for diagnostics.
///
/// A `Source` is only materialized when an error has to be rendered; the
/// lexer itself scans a borrowed `&str`. Cloning is a reference count bump.
#[derive(Clone)]
pub struct Source {
    src: Rc<SourceInternal>,
}

impl cmp::PartialEq for Source {
    fn eq(&self, other: &Source) -> bool {
        Rc::ptr_eq(&self.src, &other.src) || self.src.contents == other.src.contents
    }
}

impl cmp::Eq for Source {}

impl Debug for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        self.src.name.fmt(f)
    }
}

impl Source {
    pub fn from_contents(name: &str, contents: &str) -> Source {
        let mut lines = Vec::new();
        let mut prev_ch = ' ';
        let mut prev_pos = 0usize;
        let mut start = 0usize;
        for (i, ch) in contents.char_indices() {
            if ch == '\n' {
                let end = match prev_ch {
                    '\r' => prev_pos,
                    _ => i,
                };
                lines.push((start, end));
                start = i + 1;
            }
            prev_ch = ch;
            prev_pos = i;
        }

        if start < contents.len() {
            lines.push((start, contents.len()));
        } else if contents.is_empty() {
            lines.push((0, 0));
        } else {
            let s = contents.len();
            lines.push((s, s));
        }

        Self {
            src: Rc::new(SourceInternal {
                name: name.into(),
                contents: contents.into(),
                lines,
            }),
        }
    }

    /// Wraps a query expression under the default name `expression`.
    pub fn expression(contents: &str) -> Source {
        Self::from_contents("expression", contents)
    }

    pub fn name(&self) -> &str {
        &self.src.name
    }

    pub fn contents(&self) -> &str {
        &self.src.contents
    }

    pub fn line(&self, idx: usize) -> &str {
        if idx < self.src.lines.len() {
            let (start, end) = self.src.lines[idx];
            &self.src.contents[start..end]
        } else {
            ""
        }
    }

    /// Maps a byte offset to a 1-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end map to the
    /// column just after the last character.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = cmp::min(offset, self.src.contents.len());
        let mut line = 0usize;
        for (idx, (start, _)) in self.src.lines.iter().enumerate() {
            if *start <= offset {
                line = idx;
            } else {
                break;
            }
        }

        let (start, end) = self.src.lines[line];
        let upto = cmp::min(offset, end);
        let col = self.src.contents[start..upto].chars().count() + 1;
        (line + 1, col)
    }

    pub fn message(&self, line: usize, col: usize, kind: &str, msg: &str) -> String {
        if line == 0 || line > self.src.lines.len() {
            return format!("{}: invalid line {} specified", self.src.name, line);
        }

        let line_str = format!("{line}");
        let line_num_width = line_str.len() + 1;
        let col_spaces = col.saturating_sub(1);

        format!(
            "\n--> {}:{}:{}\n{:<line_num_width$}|\n\
		{:<line_num_width$}| {}\n\
		{:<line_num_width$}| {:<col_spaces$}^\n\
		{}: {}",
            self.src.name,
            line,
            col,
            "",
            line,
            self.line(line - 1),
            "",
            "",
            kind,
            msg
        )
    }

    /// Renders a caret diagnostic pointing at a byte offset.
    pub fn message_at(&self, offset: usize, kind: &str, msg: &str) -> String {
        let (line, col) = self.line_col(offset);
        self.message(line, col, kind, msg)
    }
}
