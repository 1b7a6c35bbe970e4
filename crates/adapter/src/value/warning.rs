//! `Warning` headers: `code agent "text" ["date"]`.

use crate::ensure;
use crate::protocol::{CodecError, Warning};
use crate::value::date::{format_date, parse_date};
use crate::value::reader::{quote, read_quoted, split_list};

/// Formats one warning as `code agent "text"`, followed by the quoted date when set.
///
/// # Errors
///
/// Fails when the code is not three digits, the agent is empty or contains whitespace, or
/// the date cannot be formatted.
pub fn format_warning(warning: &Warning) -> Result<String, CodecError> {
    ensure!((100..=999).contains(&warning.code), CodecError::invalid_number(warning.code));
    ensure!(
        !warning.agent.is_empty() && !warning.agent.bytes().any(|b| b.is_ascii_whitespace()),
        CodecError::invalid_token(format!("warning agent {:?}", warning.agent))
    );

    let mut out = format!("{} {} {}", warning.code, warning.agent, quote(&warning.text));
    if let Some(date) = warning.date {
        out.push(' ');
        out.push_str(&quote(&format_date(date)?));
    }
    Ok(out)
}

/// Parses every warning of one header line.
pub fn parse_warnings(value: &str) -> Result<Vec<Warning>, CodecError> {
    split_list(value).into_iter().map(parse_warning).collect()
}

fn parse_warning(element: &str) -> Result<Warning, CodecError> {
    let (code, rest) = element.split_once(' ').ok_or_else(|| CodecError::invalid_token(format!("warning {element:?}")))?;
    let code = code.parse::<u16>().map_err(|_| CodecError::invalid_number(code))?;
    ensure!((100..=999).contains(&code), CodecError::invalid_number(code));

    let (agent, rest) =
        rest.trim_start().split_once(' ').ok_or_else(|| CodecError::invalid_token(format!("warning {element:?}")))?;
    let (text, rest) = read_quoted(rest)?;

    let date = match rest.trim() {
        "" => None,
        quoted => Some(parse_date(&read_quoted(quoted)?.0)?),
    };
    Ok(Warning { code, agent: agent.to_string(), text, date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn format() {
        let mut warning = Warning::new(110, "proxy.example:8080", "Response is stale");
        assert_eq!(format_warning(&warning).unwrap(), r#"110 proxy.example:8080 "Response is stale""#);

        warning.date = Some(UNIX_EPOCH + Duration::from_secs(784_111_777));
        assert_eq!(
            format_warning(&warning).unwrap(),
            r#"110 proxy.example:8080 "Response is stale" "Sun, 06 Nov 1994 08:49:37 GMT""#
        );

        assert!(format_warning(&Warning::new(42, "agent", "text")).is_err());
        assert!(format_warning(&Warning::new(199, "two words", "text")).is_err());
    }

    #[test]
    fn parse() {
        let warnings =
            parse_warnings(r#"110 anderson/1.3.37 "Response is stale", 299 - "Deprecated, see docs" "Sun, 06 Nov 1994 08:49:37 GMT""#)
                .unwrap();

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0], Warning::new(110, "anderson/1.3.37", "Response is stale"));
        assert_eq!(warnings[1].code, 299);
        assert_eq!(warnings[1].agent, "-");
        assert_eq!(warnings[1].text, "Deprecated, see docs");
        assert_eq!(warnings[1].date, Some(UNIX_EPOCH + Duration::from_secs(784_111_777)));
    }

    #[test]
    fn malformed() {
        assert!(parse_warnings("110").is_err());
        assert!(parse_warnings("abc agent \"text\"").is_err());
        assert!(parse_warnings("110 agent text").is_err());
        assert!(parse_warnings("110 agent \"text\" \"not a date\"").is_err());
    }
}
