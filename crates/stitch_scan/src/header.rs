//! Locating a module's port list inside a whole source file.

use crate::error::ScanError;

/// The text of a port list and the file line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortList<'a> {
    /// Text from just after the opening `(` to the end of the file.
    pub text: &'a str,
    /// 1-based file line of the first character of `text`.
    pub first_line: usize,
}

/// Finds `module <name>` and returns the text after its port-list paren.
///
/// A `#( ... )` parameter list between the name and the port list is skipped.
pub fn locate_port_list<'a>(text: &'a str, module: &str) -> Result<PortList<'a>, ScanError> {
    let not_found = || ScanError::ModuleNotFound {
        module: module.to_string(),
    };
    let bytes = text.as_bytes();
    let mut pos = find_header(text, module).ok_or_else(not_found)?;

    pos = skip_whitespace(bytes, pos);
    if bytes.get(pos) == Some(&b'#') {
        pos = skip_whitespace(bytes, pos + 1);
        if bytes.get(pos) != Some(&b'(') {
            return Err(not_found());
        }
        pos = matching_paren(bytes, pos).ok_or_else(not_found)? + 1;
        pos = skip_whitespace(bytes, pos);
    }
    if bytes.get(pos) != Some(&b'(') {
        return Err(not_found());
    }
    let start = pos + 1;
    Ok(PortList {
        text: &text[start..],
        first_line: text[..start].matches('\n').count() + 1,
    })
}

/// Byte offset just past `module <name>`.
fn find_header(text: &str, module: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    for (idx, _) in text.match_indices("module") {
        if idx > 0 && is_ident_byte(bytes[idx - 1]) {
            continue;
        }
        let line_start = text[..idx].rfind('\n').map_or(0, |n| n + 1);
        if text[line_start..idx].contains("//") {
            continue;
        }
        let after_keyword = idx + "module".len();
        let name_start = skip_whitespace(bytes, after_keyword);
        if name_start == after_keyword {
            continue;
        }
        let name_end = name_start + module.len();
        if text[name_start..].starts_with(module)
            && !bytes.get(name_end).is_some_and(|b| is_ident_byte(*b))
        {
            return Some(name_end);
        }
    }
    None
}

fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, b) in bytes[open..].iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
