//! Ordered line builder used by the code generators.
//!
//! Output is collected one line at a time and joined once at the end.

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Lines {
    lines: Vec<String>,
}

impl Lines {
    pub fn new() -> Self {
        Lines { lines: Vec::new() }
    }

    pub fn push<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    pub fn extend(&mut self, other: Lines) {
        self.lines.extend(other.lines);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Joins the lines with a single newline, without a trailing one.
    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Builds a `Lines` from a list of string-like values.
#[macro_export]
macro_rules! lines {
    ($($line:expr),* $(,)?) => {{
        let mut out = $crate::emit::Lines::new();
        $(out.push($line);)*
        out
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_has_no_blank_edges() {
        let mut lines = Lines::new();
        lines.push("@SP");
        lines.push("M=M+1");
        assert_eq!(lines.finish(), "@SP\nM=M+1");
        assert_eq!(Lines::new().finish(), "");
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut a = lines!["a", "b"];
        a.extend(lines!["c"]);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(a.len(), 3);
    }
}
