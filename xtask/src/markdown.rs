//! Minimal Markdown scanning: inline links, heading anchors and sections.

/// An inline `[text](target)` link and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub line: usize,
    pub target: String,
}

impl Link {
    pub fn is_external(&self) -> bool {
        ["http://", "https://", "mailto:"]
            .iter()
            .any(|scheme| self.target.starts_with(scheme))
    }

    /// Split `file.md#anchor` into its file and anchor parts.
    pub fn parts(&self) -> (&str, Option<&str>) {
        match self.target.split_once('#') {
            Some((file, anchor)) => (file, Some(anchor)),
            None => (self.target.as_str(), None),
        }
    }
}

pub fn links(text: &str) -> Vec<Link> {
    let mut out = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let mut rest = line;
        while let Some(close) = rest.find("](") {
            let after = &rest[close + 2..];
            let Some(end) = after.find(')') else {
                break;
            };
            if rest[..close].contains('[') {
                out.push(Link {
                    line: index + 1,
                    target: after[..end].trim().to_string(),
                });
            }
            rest = &after[end + 1..];
        }
    }
    out
}

/// Heading slugs as GitHub renders them.
pub fn anchors(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with('#'))
        .map(|line| slugify(line.trim_start_matches('#')))
        .filter(|slug| !slug.is_empty())
        .collect()
}

pub fn slugify(heading: &str) -> String {
    let mut out = String::new();
    for c in heading.trim().to_lowercase().chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else if (c == '-' || c.is_whitespace()) && !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Lines under the `## <title>` heading, up to the next heading of the same level.
pub fn section<'a>(text: &'a str, title: &str) -> Vec<&'a str> {
    let mut lines = text.lines().skip_while(|line| {
        !(line.starts_with("## ") && line.trim_start_matches('#').trim() == title)
    });
    if lines.next().is_none() {
        return Vec::new();
    }
    lines
        .take_while(|line| !(line.starts_with("## ") || line.starts_with("# ")))
        .collect()
}
