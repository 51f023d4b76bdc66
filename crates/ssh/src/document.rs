//! An SSH config file seen as blank-line separated sections.

/// The SSH config file as an ordered list of sections.
///
/// A section is a maximal run of non-blank lines. Rendering joins sections
/// with one blank line and ends with a single newline, so a document that is
/// parsed and rendered without changes keeps every section intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<String>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let mut sections = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    sections.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }

        if !current.is_empty() {
            sections.push(current.join("\n"));
        }

        Self { sections }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// True if a section has a line that is exactly `Host <alias>` once trimmed.
    pub fn contains_host(&self, alias: &str) -> bool {
        let header = format!("Host {alias}");
        self.sections
            .iter()
            .any(|section| section.lines().any(|line| line.trim() == header))
    }

    /// Drops every section with a line starting with `Host <alias>` once trimmed.
    ///
    /// This matches more loosely than [`Document::contains_host`]: a header
    /// such as `Host compute.web1 other` is removed too.
    pub fn remove_host(&mut self, alias: &str) -> usize {
        let header = format!("Host {alias}");
        let before = self.sections.len();

        self.sections.retain(|section| {
            !section
                .lines()
                .any(|line| line.trim().starts_with(header.as_str()))
        });

        before - self.sections.len()
    }

    pub fn push(&mut self, section: impl Into<String>) {
        self.sections.push(section.into());
    }

    pub fn render(&self) -> String {
        let mut out = self.sections.join("\n\n");
        out.push('\n');
        out
    }
}
