//! Cursor over strategy source text shared by the parsers.

pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn at(input: &'a str, pos: usize) -> Self {
        Self { input, pos }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    pub(crate) fn consume_exact(&mut self, s: &str) -> bool {
        if self.remaining().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    pub(crate) fn consume_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes characters up to (not including) the first one matching `stop`.
    /// Returns `None` and leaves the cursor unchanged if `stop` never matches.
    pub(crate) fn take_until<F>(&mut self, stop: F) -> Option<&'a str>
    where
        F: Fn(char) -> bool,
    {
        let rest = self.remaining();
        let end = rest.find(stop)?;
        self.pos += end;
        Some(&rest[..end])
    }

    /// Consumes `( <args> )` where `<args>` runs to the first `)`.
    pub(crate) fn parenthesized(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.skip_whitespace();
        if !self.consume_char('(') {
            self.pos = start;
            return None;
        }
        match self.take_until(|c| c == ')') {
            Some(args) => {
                self.advance();
                Some(args)
            }
            None => {
                self.pos = start;
                None
            }
        }
    }

    /// Consumes a quoted string opened and closed by either `"` or `'`.
    /// The content must be non-empty and contain no quote characters.
    pub(crate) fn quoted(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !matches!(self.peek(), Some('"') | Some('\'')) {
            return None;
        }
        self.advance();
        match self.take_until(is_quote) {
            Some(content) if !content.is_empty() => {
                self.advance();
                Some(content)
            }
            _ => {
                self.pos = start;
                None
            }
        }
    }

    /// Parses `<keyword> ( <quoted> )` with optional whitespace between tokens.
    pub(crate) fn quoted_call(&mut self, keyword: &str) -> Option<&'a str> {
        let start = self.pos;
        let result = (|| {
            if !self.consume_exact(keyword) {
                return None;
            }
            self.skip_whitespace();
            if !self.consume_char('(') {
                return None;
            }
            self.skip_whitespace();
            let content = self.quoted()?;
            self.skip_whitespace();
            if !self.consume_char(')') {
                return None;
            }
            Some(content)
        })();
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    /// Parses `<keyword> ( <digits> )` with optional whitespace between tokens.
    pub(crate) fn integer_call(&mut self, keyword: &str) -> Option<&'a str> {
        let start = self.pos;
        let result = (|| {
            if !self.consume_exact(keyword) {
                return None;
            }
            self.skip_whitespace();
            if !self.consume_char('(') {
                return None;
            }
            self.skip_whitespace();
            let digits = self.take_while(|c| c.is_ascii_digit());
            if digits.is_empty() {
                return None;
            }
            self.skip_whitespace();
            if !self.consume_char(')') {
                return None;
            }
            Some(digits)
        })();
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    pub(crate) fn take_while<F>(&mut self, accept: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let rest = self.remaining();
        let end = rest.find(|c| !accept(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Byte offsets of every occurrence of `needle` in `haystack`.
pub(crate) fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack.match_indices(needle).map(|(i, _)| i)
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
