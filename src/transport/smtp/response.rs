//! SMTP reply, as defined in RFC 5321

use std::fmt::{self, Display, Formatter};

use nom::{
    bytes::complete::take_while_m_n,
    character::complete::one_of,
    combinator::{map_res, opt, rest},
    Parser,
};

/// A complete server reply, one or more lines sharing a reply code
///
/// The reply code of the whole response is the code of its first line,
/// or `-1` when the first line does not start with three digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    lines: Vec<(i32, String)>,
}

impl Response {
    pub(crate) fn new(lines: Vec<(i32, String)>) -> Response {
        Response { lines }
    }

    /// Reply code of the response, `-1` when unparsable
    pub fn code(&self) -> i32 {
        self.lines.first().map_or(-1, |(code, _)| *code)
    }

    /// Checks whether the reply code matches `expected`
    pub fn is(&self, expected: u16) -> bool {
        self.code() == i32::from(expected)
    }

    /// Text of every line, without codes or separators
    pub fn message(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|(_, text)| text.as_str())
    }

    /// Lines carrying the given reply code
    pub(crate) fn lines_with_code(&self, code: u16) -> impl Iterator<Item = &str> {
        let code = i32::from(code);
        self.lines
            .iter()
            .filter(move |(c, _)| *c == code)
            .map(|(_, text)| text.as_str())
    }

    /// First line's text, used to surface server wording in errors
    pub fn first_line(&self) -> &str {
        self.lines.first().map_or("", |(_, text)| text.as_str())
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (code, text)) in self.lines.iter().enumerate() {
            let sep = if i + 1 == self.lines.len() { ' ' } else { '-' };
            write!(f, "{code}{sep}{text}\r\n")?;
        }
        Ok(())
    }
}

/// Checks whether a reply line is the last of its response
///
/// Per RFC 5321 a continued line carries `-` after the code; the final
/// line carries a space. Lines too short to carry a separator end the
/// response as well.
pub(crate) fn is_final_line(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.as_bytes().get(3) {
        Some(b' ') => true,
        Some(_) => false,
        None => true,
    }
}

/// Parses one reply line into its code and text
///
/// Lines that do not begin with three ASCII digits yield code `-1` with
/// the whole line as text.
pub(crate) fn parse_line(line: &str) -> (i32, String) {
    let line = line.trim_end_matches(['\r', '\n']);
    match reply_line(line) {
        Ok((code, text)) => (i32::from(code), text.to_owned()),
        Err(_) => (-1, line.to_owned()),
    }
}

fn reply_line(i: &str) -> Result<(u16, &str), nom::Err<nom::error::Error<&str>>> {
    let (_, (code, _, text)) = (
        map_res(
            take_while_m_n(3, 3, |c: char| c.is_ascii_digit()),
            str::parse::<u16>,
        ),
        opt(one_of(" -")),
        rest,
    )
        .parse(i)?;
    Ok((code, text))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn final_line_detection() {
        assert!(is_final_line("250 OK\r\n"));
        assert!(!is_final_line("250-SIZE 35882577\r\n"));
        assert!(is_final_line("250\r\n"));
        assert!(is_final_line("hi\r\n"));
    }

    #[test]
    fn line_parsing() {
        assert_eq!(parse_line("220 smtp.example.com ESMTP\r\n"), (220, "smtp.example.com ESMTP".to_owned()));
        assert_eq!(parse_line("250-8BITMIME\r\n"), (250, "8BITMIME".to_owned()));
        assert_eq!(parse_line("354 \r\n"), (354, "".to_owned()));
        assert_eq!(parse_line("garbage\r\n"), (-1, "garbage".to_owned()));
        assert_eq!(parse_line("25x nope\r\n"), (-1, "25x nope".to_owned()));
    }

    #[test]
    fn response_code_comes_from_first_line() {
        let response = Response::new(vec![
            (250, "smtp.example.com".to_owned()),
            (250, "SIZE 1000".to_owned()),
        ]);
        assert_eq!(response.code(), 250);
        assert!(response.is(250));
        assert!(!response.is(220));
    }

    #[test]
    fn unparsable_response_code_is_negative() {
        let response = Response::new(vec![(-1, "not smtp at all".to_owned())]);
        assert_eq!(response.code(), -1);
        assert!(!response.is(250));
    }

    #[test]
    fn display_joins_lines_with_separators() {
        let response = Response::new(vec![
            (250, "A".to_owned()),
            (250, "B".to_owned()),
        ]);
        assert_eq!(response.to_string(), "250-A\r\n250 B\r\n");
    }
}
