//! Index-based cursor over the raw token sequence.
//!
//! The cursor supports stepping forward, a one-step pushback used while
//! greedily collecting array values, and a delimiter lookahead that tells
//! flag tokens (`-name`) apart from value tokens.

/// Returns true when `token` starts with one of the delimiter characters.
pub fn is_delimited(token: &str, delimiters: &[char]) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|first| delimiters.contains(&first))
}

/// Extract the parameter name from a delimiter-prefixed token.
///
/// The leading delimiter is dropped and the name is cut at the first
/// whitespace character, for tokens that reached us without being split.
pub fn flag_name(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next();
    let name = chars.as_str();
    match name.find(char::is_whitespace) {
        Some(end) => &name[..end],
        None => name,
    }
}

pub struct TokenCursor<'a, S> {
    tokens: &'a [S],
    position: usize,
    delimiters: &'a [char],
}

impl<'a, S: AsRef<str>> TokenCursor<'a, S> {
    pub fn new(tokens: &'a [S], delimiters: &'a [char]) -> Self {
        Self {
            tokens,
            position: 0,
            delimiters,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// The token under the cursor, without moving.
    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).map(|t| t.as_ref())
    }

    /// Return the token under the cursor and step past it.
    pub fn advance(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Undo the last `advance`.
    pub fn step_back(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn is_flag(&self, token: &str) -> bool {
        is_delimited(token, self.delimiters)
    }

    /// True when the cursor sits on a value token (present, not a flag).
    pub fn at_value(&self) -> bool {
        self.peek().is_some_and(|token| !self.is_flag(token))
    }

    /// Greedily consume every value token up to the next flag or the end of
    /// the stream. The flag that stops the run is pushed back.
    pub fn take_values(&mut self) -> &'a [S] {
        let start = self.position;
        while let Some(token) = self.advance() {
            if self.is_flag(token) {
                self.step_back();
                break;
            }
        }
        &self.tokens[start..self.position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASH: &[char] = &['-'];

    #[test]
    fn flag_names_drop_the_delimiter() {
        assert_eq!(flag_name("-file"), "file");
        assert_eq!(flag_name("/Name"), "Name");
        assert_eq!(flag_name("-name value"), "name");
        assert_eq!(flag_name("-name\tvalue"), "name");
        assert_eq!(flag_name("-"), "");
    }

    #[test]
    fn delimiters_are_configurable() {
        assert!(is_delimited("-a", DASH));
        assert!(!is_delimited("/a", DASH));
        assert!(is_delimited("/a", &['-', '/']));
        assert!(!is_delimited("", DASH));
    }

    #[test]
    fn advance_and_step_back() {
        let tokens = ["-a", "b"];
        let mut cursor = TokenCursor::new(&tokens, DASH);
        assert_eq!(cursor.advance(), Some("-a"));
        assert_eq!(cursor.advance(), Some("b"));
        assert!(cursor.is_at_end());
        assert_eq!(cursor.advance(), None);
        cursor.step_back();
        assert_eq!(cursor.peek(), Some("b"));
    }

    #[test]
    fn take_values_stops_before_the_next_flag() {
        let tokens = ["1", "2", "3", "-next", "4"];
        let mut cursor = TokenCursor::new(&tokens, DASH);
        assert_eq!(cursor.take_values(), &["1", "2", "3"]);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.peek(), Some("-next"));
    }

    #[test]
    fn take_values_runs_to_the_end() {
        let tokens = ["a.txt", "b.gif", "c.jpg"];
        let mut cursor = TokenCursor::new(&tokens, DASH);
        assert_eq!(cursor.take_values().len(), 3);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn take_values_on_a_flag_is_empty() {
        let tokens = ["-x"];
        let mut cursor = TokenCursor::new(&tokens, DASH);
        assert!(cursor.take_values().is_empty());
        assert!(!cursor.at_value());
        assert_eq!(cursor.position(), 0);
    }
}
