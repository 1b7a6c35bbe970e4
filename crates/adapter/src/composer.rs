//! Request header composition.
//!
//! [`Composer::compose`] turns a [`Request`] into the [`HeaderSeries`] written on the wire. The
//! phases run in a fixed order:
//!
//! 1. `Host`, `Date`, `User-Agent`, `From`
//! 2. conditional headers (`If-Match`, `If-Modified-Since`, `If-None-Match`, `If-Range`,
//!    `If-Unmodified-Since`)
//! 3. `Cookie`, `Referer`
//! 4. content negotiation (`Accept*`) and `Range`
//! 5. entity metadata (`Content-*`)
//! 6. `Warning`, `Cache-Control` and caller supplied extension headers
//! 7. `Authorization` and `Proxy-Authorization`, formatted against a read-only view of
//!    everything above
//!
//! A header whose value is absent or empty is never written. A value that fails to format is
//! reported to the [`WarningSink`] and left out; composition itself never fails.

use std::time::SystemTime;

use http::Uri;
use tracing::trace;

use crate::header::HeaderSeries;
use crate::header::names::{
    ACCEPT, ACCEPT_CHARSET, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION, CACHE_CONTROL, CONTENT_ENCODING,
    CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_MD5, CONTENT_RANGE, CONTENT_TYPE, COOKIE, DATE, FROM, HOST, IF_MATCH,
    IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, IF_UNMODIFIED_SINCE, PROXY_AUTHORIZATION, RANGE, REFERER, USER_AGENT,
    WARNING, is_composed_request_header,
};
use crate::protocol::{ChallengeResponse, CodecError, Entity, Preference, PreferenceValue, Request};
use crate::security::{Authenticator, Authenticators};
use crate::sink::{CodecWarning, WarningSink};
use crate::value::cache_control::format_cache_directives;
use crate::value::content::{format_content_type, format_md5, format_tokens};
use crate::value::cookie::format_cookies;
use crate::value::date::format_date;
use crate::value::preference::format_preferences;
use crate::value::range::{format_content_range, format_ranges};
use crate::value::tag::{format_tag, format_tags};
use crate::value::warning::format_warning;

/// `User-Agent` written when the request names none.
pub const DEFAULT_USER_AGENT: &str = concat!("micro-http-adapter/", env!("CARGO_PKG_VERSION"));

/// `Accept` written when the request lists no accepted media types.
pub const DEFAULT_ACCEPT: &str = "*/*";

/// Defaults and pluggable parts of the [`Composer`].
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// `None` disables the default `User-Agent`.
    pub user_agent: Option<String>,
    /// `None` disables the default `Accept`.
    pub default_accept: Option<String>,
    pub authenticators: Authenticators,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            default_accept: Some(DEFAULT_ACCEPT.to_string()),
            authenticators: Authenticators::default(),
        }
    }
}

/// Builds outgoing header series. Holds configuration only, so one instance can be shared
/// by any number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: ComposerConfig,
}

/// Output of one composition: the series under construction and where to report problems.
struct Output<'a> {
    headers: HeaderSeries,
    sink: &'a mut dyn WarningSink,
}

impl Output<'_> {
    /// Adds the header unless the value is absent or empty.
    fn put(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            self.headers.add(name, value);
        }
    }

    /// Adds a formatted value, reporting a formatting failure instead of the header.
    fn put_formatted(&mut self, name: &str, value: Result<Option<String>, CodecError>) {
        match value {
            Ok(value) => self.put(name, value),
            Err(cause) => self.sink.warn(CodecWarning::format(name, cause)),
        }
    }

    fn put_date(&mut self, name: &str, date: Option<SystemTime>) {
        self.put_formatted(name, date.map(format_date).transpose());
    }

    /// Adds a preference list header, nothing when the list is empty.
    fn put_preferences<M: PreferenceValue>(&mut self, name: &str, preferences: &[Preference<M>]) {
        if preferences.is_empty() {
            return;
        }
        self.put_formatted(name, format_preferences(preferences).map(Some));
    }
}

impl Composer {
    /// Creates a composer with the given defaults and authenticators.
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Composes the header series of `request`.
    ///
    /// When `request.date` is unset it is set to the current time first, so that composing
    /// the same request again yields the same headers.
    pub fn compose(&self, request: &mut Request, sink: &mut dyn WarningSink) -> HeaderSeries {
        let date = *request.date.get_or_insert_with(SystemTime::now);
        let request = &*request;

        let mut output = Output { headers: HeaderSeries::with_capacity(16), sink };

        output.put(HOST, host_value(&request.target));
        output.put_date(DATE, Some(date));
        output.put(USER_AGENT, request.client_info.agent.clone().or_else(|| self.config.user_agent.clone()));
        output.put(FROM, request.client_info.from.clone());

        compose_conditions(request, &mut output);

        output.put_formatted(COOKIE, format_cookies(&request.cookies));
        output.put(REFERER, request.referrer.as_ref().map(ToString::to_string));

        self.compose_preferences(request, &mut output);
        output.put(RANGE, format_ranges(&request.ranges));

        if request.is_entity_available() {
            if let Some(entity) = &request.entity {
                compose_entity(entity, &mut output);
            }
        }

        for warning in &request.warnings {
            output.put_formatted(WARNING, format_warning(warning).map(Some));
        }
        output.put(CACHE_CONTROL, format_cache_directives(&request.cache_directives));

        for header in &request.extension_headers {
            if is_composed_request_header(header.name()) {
                output.sink.warn(CodecWarning::ignored(header.name()));
            } else {
                output.headers.add(header.name(), header.value());
            }
        }

        self.compose_credentials(request, &mut output);

        trace!(method = %request.method, target = %request.target, headers = output.headers.len(), "composed request headers");
        output.headers
    }

    /// `Accept` falls back to the configured default, the other lists are omitted when empty.
    fn compose_preferences(&self, request: &Request, output: &mut Output<'_>) {
        let client = &request.client_info;
        if client.accepted_media_types.is_empty() {
            output.put(ACCEPT, self.config.default_accept.clone());
        } else {
            output.put_preferences(ACCEPT, &client.accepted_media_types);
        }
        output.put_preferences(ACCEPT_CHARSET, &client.accepted_character_sets);
        output.put_preferences(ACCEPT_ENCODING, &client.accepted_encodings);
        output.put_preferences(ACCEPT_LANGUAGE, &client.accepted_languages);
    }

    /// Formats both credential headers from the same view of the headers composed so far.
    fn compose_credentials(&self, request: &Request, output: &mut Output<'_>) {
        let view = &output.headers;
        let authorization = request.challenge_response.as_ref().map(|credentials| self.format_credentials(credentials, request, view));
        let proxy_authorization =
            request.proxy_challenge_response.as_ref().map(|credentials| self.format_credentials(credentials, request, view));

        output.put_formatted(AUTHORIZATION, authorization.transpose());
        output.put_formatted(PROXY_AUTHORIZATION, proxy_authorization.transpose());
    }

    /// Formats credentials with the authenticator registered for their scheme.
    fn format_credentials(&self, credentials: &ChallengeResponse, request: &Request, headers: &HeaderSeries) -> Result<String, CodecError> {
        self.config.authenticators.format_credentials(credentials, request, headers)
    }

    /// Looks up the authenticator used for `credentials`, if one is registered.
    pub fn authenticator_for(&self, credentials: &ChallengeResponse) -> Option<&dyn Authenticator> {
        self.config.authenticators.find(&credentials.scheme)
    }
}

/// Host name plus the port when it is not the default one of the scheme.
fn host_value(target: &Uri) -> Option<String> {
    let host = target.host()?;
    let default_port = match target.scheme_str() {
        Some(scheme) if scheme.eq_ignore_ascii_case("https") => 443,
        _ => 80,
    };
    match target.port_u16() {
        Some(port) if port != default_port => Some(format!("{host}:{port}")),
        _ => Some(host.to_string()),
    }
}

/// Adds the conditional headers.
///
/// `If-Range` carries either a tag or a date. When both are set the header is left out and a
/// policy warning is reported.
fn compose_conditions(request: &Request, output: &mut Output<'_>) {
    let conditions = &request.conditions;

    output.put(IF_MATCH, format_tags(&conditions.match_tags));
    output.put_date(IF_MODIFIED_SINCE, conditions.modified_since);
    output.put(IF_NONE_MATCH, format_tags(&conditions.none_match_tags));

    match (&conditions.range_tag, conditions.range_date) {
        (Some(_), Some(_)) => {
            output.sink.warn(CodecWarning::policy(IF_RANGE, "both an entity tag and a date are set, only one is allowed"));
        }
        (Some(tag), None) => output.put(IF_RANGE, Some(format_tag(tag))),
        (None, date) => output.put_date(IF_RANGE, date),
    }

    output.put_date(IF_UNMODIFIED_SINCE, conditions.unmodified_since);
}

/// Adds the entity metadata headers, in the order `Content-Type`, `Content-Encoding`,
/// `Content-Language`, `Content-Length`, `Content-Range` and `Content-MD5`.
fn compose_entity(entity: &Entity, output: &mut Output<'_>) {
    output.put(CONTENT_TYPE, entity.media_type.as_ref().map(|media_type| format_content_type(media_type, entity.character_set.as_ref())));
    output.put(CONTENT_ENCODING, format_tokens(&entity.encodings));
    output.put(CONTENT_LANGUAGE, format_tokens(&entity.languages));

    let size = entity.size.or_else(|| entity.body().and_then(|body| body.exact_size()));
    output.put(CONTENT_LENGTH, size.map(|size| size.to_string()));

    if let Some(range) = &entity.range {
        output.put_formatted(CONTENT_RANGE, format_content_range(range, size).map(Some));
    }
    output.put(CONTENT_MD5, entity.digest.as_ref().and_then(format_md5));
}
