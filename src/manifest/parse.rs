use regex::Regex;
use tracing::{debug, warn};

use crate::manifest::{Constraint, ManifestEntry, ManifestError, Operator};

const REQUIREMENT_PATTERN: &str =
    r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(\[[^\]]*\])?\s*(.*)$";
const CONSTRAINT_PATTERN: &str = r"^(===|==|~=|!=|<=|>=|<|>)\s*([^\s,;]+)$";

struct RequirementParser {
    requirement: Regex,
    constraint: Regex,
}

impl RequirementParser {
    fn new() -> Result<Self, ManifestError> {
        Ok(Self {
            requirement: Regex::new(REQUIREMENT_PATTERN)?,
            constraint: Regex::new(CONSTRAINT_PATTERN)?,
        })
    }
}

pub fn parse_manifest(content: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let parser = RequirementParser::new()?;
    let mut entries = Vec::new();
    for (line_no, line) in logical_lines(content) {
        if line.starts_with('-') {
            debug!(line = line_no, "skipping option line");
            continue;
        }
        if line.contains("://") && !line.contains('@') {
            warn!(line = line_no, "skipping bare URL requirement");
            continue;
        }
        entries.push(parse_requirement(&parser, line_no, &line)?);
    }
    Ok(entries)
}

fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let without_comment = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let trimmed = without_comment.trim();
        let (text, continues) = match trimmed.strip_suffix('\\') {
            Some(head) => (head.trim_end(), true),
            None => (trimmed, false),
        };

        let (start, mut buffer) = pending.take().unwrap_or((idx + 1, String::new()));
        if !buffer.is_empty() && !text.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(text);

        if continues {
            pending = Some((start, buffer));
        } else if !buffer.is_empty() {
            lines.push((start, buffer));
        }
    }
    if let Some((start, buffer)) = pending {
        if !buffer.is_empty() {
            lines.push((start, buffer));
        }
    }
    lines
}

fn parse_requirement(
    parser: &RequirementParser,
    line_no: usize,
    line: &str,
) -> Result<ManifestEntry, ManifestError> {
    let malformed = || ManifestError::Malformed {
        line: line_no,
        content: line.to_string(),
    };

    let requirement = line.split(';').next().unwrap_or_default().trim();
    let captures = parser
        .requirement
        .captures(requirement)
        .ok_or_else(malformed)?;
    let name = captures.get(1).map(|m| m.as_str()).ok_or_else(malformed)?;
    let rest = captures.get(3).map(|m| m.as_str().trim()).unwrap_or_default();

    if rest.starts_with('@') {
        return Ok(ManifestEntry::new(name, Vec::new()));
    }

    let rest = rest
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(rest);

    let mut constraints = Vec::new();
    for piece in rest.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let captures = parser
            .constraint
            .captures(piece)
            .ok_or_else(malformed)?;
        let op = captures
            .get(1)
            .and_then(|m| Operator::parse(m.as_str()))
            .ok_or_else(malformed)?;
        let version = captures.get(2).map(|m| m.as_str()).ok_or_else(malformed)?;
        constraints.push(Constraint::new(op, version));
    }

    Ok(ManifestEntry::new(name, constraints))
}
