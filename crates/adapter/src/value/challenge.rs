//! `WWW-Authenticate`, `Proxy-Authenticate`, `Authorization`, `Proxy-Authorization` and
//! `Authentication-Info`.
//!
//! Only the generic `scheme param=value, ...` grammar lives here. Scheme specific credential
//! formatting goes through [`Authenticator`](crate::security::Authenticator)s.

use crate::ensure;
use crate::protocol::{AuthenticationInfo, ChallengeRequest, ChallengeResponse, ChallengeScheme, CodecError, Parameter};
use crate::value::reader::{is_token, parse_parameter_list, quote, token_or_quoted};

/// Splits the leading scheme token off a challenge or credentials value.
fn split_scheme(value: &str) -> Result<(ChallengeScheme, &str), CodecError> {
    let value = value.trim();
    let (scheme, rest) = value.split_once(char::is_whitespace).unwrap_or((value, ""));
    ensure!(is_token(scheme), CodecError::invalid_challenge(format!("invalid scheme in {value:?}")));
    Ok((ChallengeScheme::new(scheme), rest.trim()))
}

fn is_token68(value: &str) -> bool {
    let body = value.trim_end_matches('=');
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'+' | b'/'))
}

fn parse_parameters(rest: &str) -> Result<Vec<Parameter>, CodecError> {
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    // a single token68 blob, e.g. `Negotiate YIIB...`
    if is_token68(rest) {
        return Ok(vec![Parameter::new(rest, "")]);
    }
    Ok(parse_parameter_list(rest)?.into_iter().map(|(name, value)| Parameter::new(name, value)).collect())
}

/// Parses one challenge, such as `Basic realm="example"`.
pub fn parse_challenge_request(value: &str) -> Result<ChallengeRequest, CodecError> {
    let (scheme, rest) = split_scheme(value)?;
    let mut parameters = parse_parameters(rest)?;

    let realm = parameters.iter().position(|p| p.name.eq_ignore_ascii_case("realm")).map(|index| parameters.remove(index).value);
    Ok(ChallengeRequest { scheme, realm, parameters })
}

/// Formats a challenge, `realm` first and then the other parameters in order.
pub fn format_challenge_request(challenge: &ChallengeRequest) -> String {
    let mut parameters = Vec::with_capacity(challenge.parameters.len() + 1);
    if let Some(realm) = &challenge.realm {
        parameters.push(format!("realm={}", quote(realm)));
    }
    parameters.extend(challenge.parameters.iter().map(format_parameter));
    join_scheme(&challenge.scheme, &parameters.join(", "))
}

/// Formats credentials in the generic form: the raw text when set, otherwise the parameters.
pub fn format_generic_credentials(credentials: &ChallengeResponse) -> String {
    match &credentials.raw {
        Some(raw) => join_scheme(&credentials.scheme, raw),
        None => {
            let parameters: Vec<String> = credentials.parameters.iter().map(format_parameter).collect();
            join_scheme(&credentials.scheme, &parameters.join(", "))
        }
    }
}

/// Parses credentials without scheme specific decoding.
///
/// Parameter lists end up in `parameters`, anything else is kept in `raw`.
pub fn parse_generic_credentials(value: &str) -> Result<ChallengeResponse, CodecError> {
    let (scheme, rest) = split_scheme(value)?;
    let mut credentials = ChallengeResponse::new(scheme);
    match parse_parameters(rest)?.as_slice() {
        [] => {}
        [single] if single.value.is_empty() => credentials.raw = Some(single.name.clone()),
        parameters => credentials.parameters = parameters.to_vec(),
    }
    Ok(credentials)
}

fn format_parameter(parameter: &Parameter) -> String {
    if parameter.value.is_empty() && !parameter.name.is_empty() {
        return parameter.name.clone();
    }
    format!("{}={}", parameter.name, token_or_quoted(&parameter.value))
}

fn join_scheme(scheme: &ChallengeScheme, rest: &str) -> String {
    if rest.is_empty() { scheme.to_string() } else { format!("{scheme} {rest}") }
}

/// Parses `Authentication-Info`.
///
/// `nc` is read as hexadecimal, unknown parameters are ignored.
pub fn parse_authentication_info(value: &str) -> Result<AuthenticationInfo, CodecError> {
    let mut info = AuthenticationInfo::default();
    for (name, value) in parse_parameter_list(value)? {
        match name.to_ascii_lowercase().as_str() {
            "nextnonce" => info.next_nonce = Some(value),
            "qop" => info.quality = Some(value),
            "rspauth" => info.response_digest = Some(value),
            "cnonce" => info.client_nonce = Some(value),
            "nc" => {
                info.nonce_count = Some(u32::from_str_radix(&value, 16).map_err(|_| CodecError::invalid_number(&value))?);
            }
            _ => {}
        }
    }
    Ok(info)
}
