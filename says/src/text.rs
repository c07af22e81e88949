//! Word wrapping of status messages for fixed-width fonts.

/// Split `text` into lines of at most `width` characters
///
/// Explicit newlines always break. Lines are broken at the last space that
/// fits, words longer than `width` are cut.
pub fn wrap(text: &str, width: usize) -> Wrap<'_> {
    Wrap {
        rest: text,
        width: width.max(1),
    }
}

pub struct Wrap<'a> {
    rest: &'a str,
    width: usize,
}

impl<'a> Iterator for Wrap<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let rest = self.rest;
        let end = rest.find('\n').unwrap_or_else(|| rest.len());
        let line = &rest[..end];

        let cut = match line.char_indices().nth(self.width) {
            Some((cut, _)) => cut,
            None => {
                self.rest = rest.get(end + 1..).unwrap_or("");
                return Some(line);
            }
        };

        let head = &line[..cut];
        if line[cut..].starts_with(' ') {
            self.rest = &rest[cut + 1..];
            return Some(head);
        }
        match head.rfind(' ') {
            Some(space) if space > 0 => {
                self.rest = &rest[space + 1..];
                Some(&line[..space])
            }
            _ => {
                self.rest = &rest[cut..];
                Some(head)
            }
        }
    }
}
