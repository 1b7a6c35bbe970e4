//! Entity lifecycle after interpretation.
//!
//! Some responses are bodiless whatever the transport returned. Their content is released
//! eagerly, and for `205 Reset Content` and `1xx` the entity itself is dropped unless it is
//! already known to be empty.

use http::Method;
use tracing::debug;

use crate::protocol::{Entity, Response};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Action {
    /// Release the byte source, keep the entity and its metadata.
    Release,
    /// Release and drop the entity.
    Discard,
}

type Condition = fn(&Method, &Response) -> bool;

/// Checked in order, the first matching rule decides.
const RULES: &[(&str, Condition, Action)] = &[
    ("empty entity", |_, response| response.entity.as_ref().is_some_and(is_empty), Action::Release),
    ("HEAD request", |method, _| *method == Method::HEAD, Action::Release),
    ("204 No Content", |_, response| response.status == 204, Action::Release),
    ("205 Reset Content", |_, response| response.status == 205, Action::Discard),
    ("304 Not Modified", |_, response| response.status == 304, Action::Release),
    ("informational status", |_, response| response.status.is_informational(), Action::Discard),
];

fn is_empty(entity: &Entity) -> bool {
    entity.size == Some(0) || entity.body().and_then(|body| body.exact_size()) == Some(0)
}

/// Applies the lifecycle rules of a response to a `method` request.
pub fn apply_entity_lifecycle(method: &Method, response: &mut Response) {
    if response.entity.is_none() {
        return;
    }

    let Some((rule, _, action)) = RULES.iter().find(|(_, condition, _)| condition(method, response)) else {
        return;
    };
    debug!(rule = %rule, ?action, "entity lifecycle rule matched");

    match action {
        Action::Release => {
            if let Some(entity) = response.entity.as_mut() {
                entity.release();
            }
        }
        Action::Discard => {
            if let Some(mut entity) = response.entity.take() {
                entity.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{EntityBody, Status};

    fn with_entity(code: u16, body: &'static str) -> Response {
        let mut response = Response::new(Status::new(code, None));
        response.entity = Some(Entity::full(mime::TEXT_PLAIN, body));
        response
    }

    #[test]
    fn no_content_is_released() {
        let mut response = with_entity(204, "placeholder");
        apply_entity_lifecycle(&Method::GET, &mut response);

        let entity = response.entity.as_ref().unwrap();
        assert!(entity.is_released());
        assert!(!response.is_entity_available());
        assert_eq!(entity.media_type, Some(mime::TEXT_PLAIN));
    }

    #[test]
    fn reset_content_and_informational_drop_the_entity() {
        for code in [205, 100, 101] {
            let mut response = with_entity(code, "placeholder");
            apply_entity_lifecycle(&Method::GET, &mut response);
            assert!(response.entity.is_none(), "status {code}");
        }
    }

    #[test]
    fn head_and_not_modified_are_released() {
        let mut response = with_entity(200, "body");
        apply_entity_lifecycle(&Method::HEAD, &mut response);
        assert!(response.entity.as_ref().unwrap().is_released());

        let mut response = with_entity(304, "body");
        apply_entity_lifecycle(&Method::GET, &mut response);
        assert!(response.entity.as_ref().unwrap().is_released());
    }

    #[test]
    fn empty_entity_is_released() {
        let mut response = Response::new(Status::SUCCESS_OK);
        let mut entity = Entity::new().with_body(EntityBody::full(""));
        entity.size = Some(0);
        response.entity = Some(entity);

        apply_entity_lifecycle(&Method::GET, &mut response);
        assert!(response.entity.as_ref().unwrap().is_released());
    }

    #[test]
    fn empty_entity_rule_comes_first() {
        for code in [205, 101] {
            let mut response = Response::new(Status::new(code, None));
            let mut entity = Entity::new().with_body(EntityBody::full(""));
            entity.size = Some(0);
            response.entity = Some(entity);

            apply_entity_lifecycle(&Method::GET, &mut response);
            assert!(response.entity.as_ref().is_some_and(Entity::is_released), "status {code}");
        }
    }

    #[test]
    fn ordinary_responses_keep_their_content() {
        let mut response = with_entity(200, "body");
        apply_entity_lifecycle(&Method::GET, &mut response);
        assert!(response.is_entity_available());

        let mut response = Response::new(Status::SUCCESS_NO_CONTENT);
        apply_entity_lifecycle(&Method::GET, &mut response);
        assert!(response.entity.is_none());
    }
}
