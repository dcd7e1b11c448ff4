use super::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Drop `//` and `/* */` comments before matching, so commented-out imports and
    /// image paths no longer count as references.
    pub strip_comments: bool,
}

/// Returns the distinct references found in `source`: `import ... from` and `require()`
/// specifiers verbatim, followed by quoted image literals resolved against the directory
/// of `source_path`.
///
/// This is pattern matching over raw text, not a parse. Multi-line imports are missed and
/// text inside comments or template strings can produce matches.
pub fn extract_references(source: &str, source_path: &Path) -> Vec<String> {
    extract_references_with(source, source_path, ExtractOptions::default())
}

pub fn extract_references_with(
    source: &str,
    source_path: &Path,
    options: ExtractOptions,
) -> Vec<String> {
    let stripped;
    let text = if options.strip_comments {
        stripped = strip_comments(source);
        stripped.as_str()
    } else {
        source
    };

    let mut out = Vec::new();
    let mut seen = HashSet::new();

    for re in [&*IMPORT_FROM_RE, &*REQUIRE_RE] {
        for caps in re.captures_iter(text) {
            let specifier = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            push_unique(&mut out, &mut seen, specifier.to_string());
        }
    }

    let base_dir = source_path.parent().unwrap_or(Path::new(""));
    for caps in INLINE_ASSET_RE.captures_iter(text) {
        let Some(literal) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let resolved = resolve_lexically(base_dir, literal.as_str());
        push_unique(&mut out, &mut seen, resolved.to_string_lossy().into_owned());
    }

    out
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, value: String) {
    if !value.is_empty() && seen.insert(value.clone()) {
        out.push(value);
    }
}

/// Removes line and block comments while leaving string and template literals intact.
/// Newlines inside removed comments are kept so line structure survives.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == open {
                quote = None;
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('\'' | '"' | '`', _) => {
                quote = Some(c);
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    out
}
