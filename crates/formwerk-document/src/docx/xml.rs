// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal XML builder for WordprocessingML parts.
//
// Parts are small and produced in one pass, so a string buffer with an
// element stack is enough; attribute values and text are always escaped.

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Outside the XML 1.0 `Char` production; not even escapable.
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

/// Chained builder producing one XML document.
pub(crate) struct XmlBuilder {
    buf: String,
    open: Vec<&'static str>,
}

impl XmlBuilder {
    /// Start a document with the standard declaration.
    pub(crate) fn new() -> Self {
        Self {
            buf: String::from(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
            ),
            open: Vec::new(),
        }
    }

    fn start_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
    }

    /// Open an element; it stays open until the matching [`close`](Self::close).
    pub(crate) fn open(&mut self, tag: &'static str, attrs: &[(&str, &str)]) -> &mut Self {
        self.start_tag(tag, attrs);
        self.buf.push('>');
        self.open.push(tag);
        self
    }

    /// Write a self-closing element.
    pub(crate) fn empty(&mut self, tag: &'static str, attrs: &[(&str, &str)]) -> &mut Self {
        self.start_tag(tag, attrs);
        self.buf.push_str("/>");
        self
    }

    /// Write escaped character data.
    pub(crate) fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape(text));
        self
    }

    /// Close the innermost open element.
    pub(crate) fn close(&mut self) -> &mut Self {
        if let Some(tag) = self.open.pop() {
            self.buf.push_str("</");
            self.buf.push_str(tag);
            self.buf.push('>');
        }
        self
    }

    /// Close anything still open and return the document.
    pub(crate) fn build(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&apos;s&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_drops_illegal_control_characters() {
        assert_eq!(escape("a\u{0}b\u{7}c\td"), "abc\td");
    }

    #[test]
    fn escape_drops_noncharacters() {
        let out = escape("a\u{FFFF}b\u{FFFE}c\u{FFFD}");
        assert_eq!(out, "abc\u{FFFD}");
    }

    #[test]
    fn builder_nests_and_auto_closes() {
        let mut xml = XmlBuilder::new();
        xml.open("w:p", &[])
            .open("w:r", &[])
            .empty("w:b", &[])
            .open("w:t", &[("xml:space", "preserve")])
            .text("1 < 2")
            .close();
        let out = xml.build();
        assert!(out.starts_with("<?xml"));
        assert!(out.ends_with(
            "<w:p><w:r><w:b/><w:t xml:space=\"preserve\">1 &lt; 2</w:t></w:r></w:p>"
        ));
    }
}
