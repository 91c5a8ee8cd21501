//! Line-preserving reader/writer for the `[section]` / `key = value` format
//! used by both the profile file and git's own config files.
//!
//! Lines that are never touched are written back exactly as read, so
//! comments, unrelated sections and the original indentation survive a
//! load-modify-save cycle. Git config files additionally get case-insensitive
//! section and key names (see [`IniDocument::ignore_case`]).

use std::{fmt, fs, path::Path};

use crate::error::AppError;

/// Name reserved for keys that appear before any section header
pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Clone)]
enum Line {
    /// Blank line or comment
    Raw(String),
    /// `raw` spans every physical line of a `\`-continued value
    Entry {
        key: String,
        value: String,
        raw: String,
    },
}

#[derive(Debug, Clone)]
struct Section {
    /// `None` for the implicit section before the first header
    name: Option<String>,
    header: Option<String>,
    lines: Vec<Line>,
}

impl Section {
    fn is_default(&self) -> bool {
        self.name.as_deref().is_none_or(|name| name == DEFAULT_SECTION)
    }

    fn is_named(&self, name: &str, ignore_case: bool) -> bool {
        self.name
            .as_deref()
            .is_some_and(|own| section_names_match(own, name, ignore_case))
    }

    fn entry_indent(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { raw, .. } => Some(leading_whitespace(raw)),
            _ => None,
        })
    }
}

/// Parse failure with the 1-based line it happened on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub detail: String,
}

impl ParseError {
    fn at(line: usize, detail: &str) -> Self {
        Self {
            line,
            detail: detail.to_string(),
        }
    }
}

/// In-memory INI file
#[derive(Debug, Clone)]
pub struct IniDocument {
    sections: Vec<Section>,
    indent: String,
    ignore_case: bool,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self {
            sections: vec![Section {
                name: None,
                header: None,
                lines: Vec::new(),
            }],
            indent: String::new(),
            ignore_case: false,
        }
    }
}

impl IniDocument {
    /// Indentation for entries added to sections that have none yet
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    /// Matches section and key names the way git does: section and key
    /// names ignore ASCII case, `[section "subsection"]` names do not
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut doc = Self::default();
        let mut lines = text.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let number = index + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                doc.last_section().lines.push(Line::Raw(raw.to_string()));
                continue;
            }

            if line.starts_with('[') {
                let end = line
                    .find(']')
                    .ok_or_else(|| ParseError::at(number, "unterminated section header"))?;
                let trailing = line[end + 1..].trim_start();
                if !(trailing.is_empty() || trailing.starts_with('#') || trailing.starts_with(';')) {
                    return Err(ParseError::at(number, "unexpected text after section header"));
                }

                let name = line[1..end].trim();
                if name.is_empty() {
                    return Err(ParseError::at(number, "empty section name"));
                }

                doc.sections.push(Section {
                    name: Some(name.to_string()),
                    header: Some(raw.to_string()),
                    lines: Vec::new(),
                });
                continue;
            }

            // a trailing unescaped backslash joins the next physical line
            let mut logical = line.to_string();
            let mut raw = raw.to_string();
            while ends_with_continuation(&logical) {
                let Some((_, next)) = lines.next() else {
                    return Err(ParseError::at(number, "backslash continuation at end of file"));
                };
                logical.pop();
                logical.push_str(next.trim_end());
                raw.push('\n');
                raw.push_str(next);
            }
            let line = logical.as_str();

            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), parse_value(value)),
                None if is_bare_key(line) => (line, "true".to_string()),
                None => return Err(ParseError::at(number, "expected `key = value`")),
            };
            if key.is_empty() {
                return Err(ParseError::at(number, "missing key before `=`"));
            }

            doc.last_section().lines.push(Line::Entry {
                key: key.to_string(),
                value,
                raw,
            });
        }

        Ok(doc)
    }

    /// Reads and parses a file, reporting syntax errors against `path`
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|err| AppError::MalformedConfig {
            path: path.to_path_buf(),
            line: err.line,
            detail: err.detail,
        })
    }

    /// Replaces `path` in one step: the text goes to a sibling temporary
    /// file which is then renamed over the target
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&temp_path, self.to_string())?;
        if let Err(err) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section_index(name).is_some()
    }

    /// Named sections in file order, the default section excluded
    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|section| !section.is_default())
            .filter_map(|section| section.name.as_deref())
            .collect()
    }

    /// First value of `key` in the first section called `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let index = self.section_index(section)?;
        let ignore_case = self.ignore_case;
        self.sections[index].lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value, .. } if keys_match(k, key, ignore_case) => {
                Some(value.as_str())
            }
            _ => None,
        })
    }

    /// Replaces the first `key` entry of `section`, adding the entry (and the
    /// section) when missing
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let index = match self.section_index(section) {
            Some(index) => index,
            None => self.push_section(section),
        };
        let indent = self.sections[index]
            .entry_indent()
            .unwrap_or(&self.indent)
            .to_string();
        let ignore_case = self.ignore_case;
        let lines = &mut self.sections[index].lines;

        for line in lines.iter_mut() {
            if let Line::Entry { key: k, value: v, raw } = line {
                if keys_match(k, key, ignore_case) {
                    // the existing key spelling is kept
                    *raw = format!("{}{k} = {}", leading_whitespace(raw), format_value(value));
                    *v = value.to_string();
                    return;
                }
            }
        }

        let position = lines
            .iter()
            .rposition(|line| matches!(line, Line::Entry { .. }))
            .map(|last| last + 1)
            .unwrap_or_else(|| {
                lines.len()
                    - lines
                        .iter()
                        .rev()
                        .take_while(|line| matches!(line, Line::Raw(raw) if raw.trim().is_empty()))
                        .count()
            });
        lines.insert(
            position,
            Line::Entry {
                key: key.to_string(),
                value: value.to_string(),
                raw: format!("{indent}{key} = {}", format_value(value)),
            },
        );
    }

    /// Removes every `key` entry of `section`; returns whether any existed
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        let Some(index) = self.section_index(section) else {
            return false;
        };
        let ignore_case = self.ignore_case;
        let lines = &mut self.sections[index].lines;
        let before = lines.len();
        lines.retain(|line| {
            !matches!(line, Line::Entry { key: k, .. } if keys_match(k, key, ignore_case))
        });
        lines.len() != before
    }

    /// Removes the first section called `name`; returns whether it existed
    pub fn remove_section(&mut self, name: &str) -> bool {
        match self.section_index(name) {
            Some(index) if index > 0 => {
                self.sections.remove(index);
                true
            }
            _ => false,
        }
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        let ignore_case = self.ignore_case;
        self.sections
            .iter()
            .position(|section| section.is_named(name, ignore_case))
    }

    fn last_section(&mut self) -> &mut Section {
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    fn push_section(&mut self, name: &str) -> usize {
        let has_content = self
            .sections
            .iter()
            .any(|section| section.header.is_some() || !section.lines.is_empty());
        let previous = self.last_section();
        let ends_blank = matches!(previous.lines.last(), Some(Line::Raw(raw)) if raw.trim().is_empty());
        if has_content && !ends_blank {
            previous.lines.push(Line::Raw(String::new()));
        }

        self.sections.push(Section {
            name: Some(name.to_string()),
            header: Some(format!("[{name}]")),
            lines: Vec::new(),
        });
        self.sections.len() - 1
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            if let Some(header) = &section.header {
                writeln!(f, "{header}")?;
            }
            for line in &section.lines {
                let (Line::Raw(raw) | Line::Entry { raw, .. }) = line;
                writeln!(f, "{raw}")?;
            }
        }
        Ok(())
    }
}

fn keys_match(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case { a.eq_ignore_ascii_case(b) } else { a == b }
}

/// `[section "sub"]`: the section part follows `ignore_case`, the
/// subsection part is always exact
fn section_names_match(a: &str, b: &str, ignore_case: bool) -> bool {
    if !ignore_case {
        return a == b;
    }
    let split = |name: &str| match name.split_once(char::is_whitespace) {
        Some((section, sub)) => (section.to_string(), sub.trim().to_string()),
        None => (name.to_string(), String::new()),
    };
    let (a_section, a_sub) = split(a);
    let (b_section, b_sub) = split(b);
    a_section.eq_ignore_ascii_case(&b_section) && a_sub == b_sub
}

/// True when the line ends in a backslash that is not itself escaped
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn is_bare_key(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Strips comments and quotes, resolving backslash escapes
fn parse_value(raw: &str) -> String {
    let raw = raw.trim();
    let mut value = String::with_capacity(raw.len());
    let mut quoted = false;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(other) => value.push(other),
                None => {}
            },
            '#' | ';' if !quoted => break,
            c if c.is_whitespace() && !quoted => value.push(' '),
            c => value.push(c),
        }
    }

    if raw.contains('"') {
        value
    } else {
        value.trim_end().to_string()
    }
}

fn format_value(value: &str) -> String {
    let needs_quotes = value != value.trim()
        || value.contains(['#', ';', '"', '\\', '\n', '\t']);
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
