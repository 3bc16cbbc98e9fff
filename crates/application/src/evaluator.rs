//! Expectation evaluator.
//!
//! Applies declarative expectations to a [`ResponseRecord`], producing a
//! pass/fail outcome per expectation. Evaluation is pure: no I/O, no
//! panics, and the same inputs always yield the same outcome. Failures
//! are reported as data with an expected-vs-actual detail, never raised.

use std::collections::HashMap;

use serde_json::Value;

use apicheck_domain::{Expectation, ExpectationOutcome, JsonKind, ResponseRecord};

/// Evaluate a single expectation against a response, with no captured
/// values in scope.
#[must_use]
pub fn evaluate(response: &ResponseRecord, expectation: &Expectation) -> ExpectationOutcome {
    evaluate_with(response, expectation, &HashMap::new())
}

/// Evaluate a single expectation against a response, given the values
/// captured by earlier steps of the same scenario.
#[must_use]
pub fn evaluate_with(
    response: &ResponseRecord,
    expectation: &Expectation,
    captures: &HashMap<String, Value>,
) -> ExpectationOutcome {
    match expectation {
        Expectation::StatusEquals { expected } => {
            let actual = response.status;
            if actual == *expected {
                ExpectationOutcome::pass(expectation.clone(), format!("status {actual}"))
            } else {
                ExpectationOutcome::fail(
                    expectation.clone(),
                    format!("expected status {expected}, got {actual}"),
                )
            }
        }
        Expectation::HeaderContains { name, substring } => match response.header(name) {
            Some(value) if value.contains(substring.as_str()) => {
                ExpectationOutcome::pass(expectation.clone(), format!("'{name}' is '{value}'"))
            }
            Some(value) => ExpectationOutcome::fail(
                expectation.clone(),
                format!("header '{name}' is '{value}', expected to contain '{substring}'"),
            ),
            None => ExpectationOutcome::fail(
                expectation.clone(),
                format!("header '{name}' not present"),
            ),
        },
        Expectation::LatencyBelow { max_ms } => {
            let actual = response.elapsed_millis();
            if actual < *max_ms {
                ExpectationOutcome::pass(expectation.clone(), format!("{actual}ms"))
            } else {
                ExpectationOutcome::fail(
                    expectation.clone(),
                    format!("elapsed {actual}ms, expected < {max_ms}ms"),
                )
            }
        }
        body_scoped => evaluate_on_value(&response.body, body_scoped, captures),
    }
}

/// Evaluate a body-scoped expectation against an arbitrary JSON value.
///
/// This is what lets `ArrayAllMatch` reuse the same checks per element:
/// the element stands in as the body. Response-level expectations
/// (status, headers, latency) are not applicable here and fail with a
/// detail saying so.
fn evaluate_on_value(
    body: &Value,
    expectation: &Expectation,
    captures: &HashMap<String, Value>,
) -> ExpectationOutcome {
    match expectation {
        Expectation::HasProperty { path } => match resolve_path(body, path) {
            Ok(value) => ExpectationOutcome::pass(
                expectation.clone(),
                format!("'{path}' is {}", preview(value)),
            ),
            Err(detail) => ExpectationOutcome::fail(expectation.clone(), detail),
        },
        Expectation::PropertyEquals { path, expected } => match resolve_path(body, path) {
            Ok(actual) if actual == expected => {
                ExpectationOutcome::pass(expectation.clone(), format!("'{path}' == {expected}"))
            }
            Ok(actual) => ExpectationOutcome::fail(
                expectation.clone(),
                format!("'{path}' is {}, expected {expected}", preview(actual)),
            ),
            Err(detail) => ExpectationOutcome::fail(expectation.clone(), detail),
        },
        Expectation::PropertyContains { path, substring } => match resolve_path(body, path) {
            Ok(Value::String(actual)) if actual.contains(substring.as_str()) => {
                ExpectationOutcome::pass(expectation.clone(), format!("'{path}' is '{actual}'"))
            }
            Ok(Value::String(actual)) => ExpectationOutcome::fail(
                expectation.clone(),
                format!("'{path}' is '{actual}', expected to contain '{substring}'"),
            ),
            Ok(other) => ExpectationOutcome::fail(
                expectation.clone(),
                format!("'{path}' is {}, expected a string", JsonKind::of(other)),
            ),
            Err(detail) => ExpectationOutcome::fail(expectation.clone(), detail),
        },
        Expectation::PropertyInCaptured { path, capture } => match resolve_path(body, path) {
            Ok(actual) => match captures.get(capture) {
                Some(Value::Array(members)) if members.contains(actual) => {
                    ExpectationOutcome::pass(
                        expectation.clone(),
                        format!("'{path}' found in '{capture}'"),
                    )
                }
                Some(Value::Array(_)) => ExpectationOutcome::fail(
                    expectation.clone(),
                    format!(
                        "'{path}' is {}, not a member of captured '{capture}'",
                        preview(actual)
                    ),
                ),
                Some(value) if value == actual => ExpectationOutcome::pass(
                    expectation.clone(),
                    format!("'{path}' == captured '{capture}'"),
                ),
                Some(value) => ExpectationOutcome::fail(
                    expectation.clone(),
                    format!(
                        "'{path}' is {}, captured '{capture}' is {}",
                        preview(actual),
                        preview(value)
                    ),
                ),
                None => ExpectationOutcome::fail(
                    expectation.clone(),
                    format!("no captured value named '{capture}'"),
                ),
            },
            Err(detail) => ExpectationOutcome::fail(expectation.clone(), detail),
        },
        Expectation::PropertyType { path, kind } => match resolve_path(body, path) {
            Ok(actual) => {
                let actual_kind = JsonKind::of(actual);
                if actual_kind == *kind {
                    ExpectationOutcome::pass(expectation.clone(), format!("'{path}' is {kind}"))
                } else {
                    ExpectationOutcome::fail(
                        expectation.clone(),
                        format!("'{path}' is {actual_kind}, expected {kind}"),
                    )
                }
            }
            Err(detail) => ExpectationOutcome::fail(expectation.clone(), detail),
        },
        Expectation::ArrayLength { count } => match body.as_array() {
            Some(items) if items.len() == *count => {
                ExpectationOutcome::pass(expectation.clone(), format!("length {count}"))
            }
            Some(items) => ExpectationOutcome::fail(
                expectation.clone(),
                format!("array has length {}, expected {count}", items.len()),
            ),
            None => ExpectationOutcome::fail(
                expectation.clone(),
                format!("body is {}, expected an array", JsonKind::of(body)),
            ),
        },
        Expectation::ArrayAllMatch { each } => match body.as_array() {
            Some(items) => {
                if !is_element_applicable(each) {
                    return ExpectationOutcome::fail(
                        expectation.clone(),
                        format!("'{}' is not applicable per element", each.description()),
                    );
                }
                for (index, item) in items.iter().enumerate() {
                    let inner = evaluate_on_value(item, each, captures);
                    if !inner.passed {
                        return ExpectationOutcome::fail(
                            expectation.clone(),
                            format!("element {index}: {}", inner.detail),
                        );
                    }
                }
                ExpectationOutcome::pass(
                    expectation.clone(),
                    format!("all {} elements matched", items.len()),
                )
            }
            None => ExpectationOutcome::fail(
                expectation.clone(),
                format!("body is {}, expected an array", JsonKind::of(body)),
            ),
        },
        // Response-level expectations reaching here means they were nested
        // inside ArrayAllMatch, where no response context exists.
        other => ExpectationOutcome::fail(
            other.clone(),
            format!("'{}' is not applicable per element", other.description()),
        ),
    }
}

const fn is_element_applicable(expectation: &Expectation) -> bool {
    !matches!(
        expectation,
        Expectation::StatusEquals { .. }
            | Expectation::HeaderContains { .. }
            | Expectation::LatencyBelow { .. }
    )
}

/// Resolve a dotted/indexed accessor path into a JSON value.
///
/// Supports `field`, `field.nested`, `field[0]`, `[1].field`, and
/// combinations. An empty path resolves to the value itself. Misses
/// report the first unresolved segment rather than erroring out.
fn resolve_path<'a>(root: &'a Value, path: &str) -> Result<&'a Value, String> {
    let mut current = root;
    for segment in split_segments(path) {
        match segment {
            Segment::Key(name) => {
                current = current.get(name).ok_or_else(|| {
                    format!(
                        "unresolved segment '{name}' in '{path}' ({} found)",
                        JsonKind::of(current)
                    )
                })?;
            }
            Segment::Index(index) => {
                current = current.get(index).ok_or_else(|| {
                    format!(
                        "unresolved index [{index}] in '{path}' ({} found)",
                        JsonKind::of(current)
                    )
                })?;
            }
            Segment::Wildcard => {
                return Err(format!(
                    "wildcard segment in '{path}' is only valid in a capture path"
                ));
            }
            Segment::Invalid(text) => {
                return Err(format!("invalid path segment '{text}' in '{path}'"));
            }
        }
    }
    Ok(current)
}

/// Resolve a capture path into an owned JSON value.
///
/// Same accessor syntax as expectation paths, plus `[*]`: the remaining
/// path is mapped over every element of the array at that point,
/// collecting the results into a new array. `"[*].id"` over a user list
/// yields the array of user ids.
///
/// # Errors
///
/// Reports the first unresolved or invalid segment, like expectation
/// path misses.
pub fn capture_value(body: &Value, path: &str) -> Result<Value, String> {
    capture_segments(body, &split_segments(path), path)
}

fn capture_segments(current: &Value, segments: &[Segment<'_>], path: &str) -> Result<Value, String> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(current.clone());
    };
    match head {
        Segment::Key(name) => {
            let next = current.get(*name).ok_or_else(|| {
                format!(
                    "unresolved segment '{name}' in '{path}' ({} found)",
                    JsonKind::of(current)
                )
            })?;
            capture_segments(next, rest, path)
        }
        Segment::Index(index) => {
            let next = current.get(*index).ok_or_else(|| {
                format!(
                    "unresolved index [{index}] in '{path}' ({} found)",
                    JsonKind::of(current)
                )
            })?;
            capture_segments(next, rest, path)
        }
        Segment::Wildcard => {
            let items = current.as_array().ok_or_else(|| {
                format!(
                    "wildcard in '{path}' needs an array ({} found)",
                    JsonKind::of(current)
                )
            })?;
            let mut collected = Vec::with_capacity(items.len());
            for item in items {
                collected.push(capture_segments(item, rest, path)?);
            }
            Ok(Value::Array(collected))
        }
        Segment::Invalid(text) => Err(format!("invalid path segment '{text}' in '{path}'")),
    }
}

enum Segment<'a> {
    Key(&'a str),
    Index(usize),
    Wildcard,
    Invalid(&'a str),
}

fn split_segments(path: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for part in path.split('.').filter(|p| !p.is_empty()) {
        let mut rest = part;
        if let Some(bracket) = rest.find('[') {
            let name = &rest[..bracket];
            if !name.is_empty() {
                segments.push(Segment::Key(name));
            }
            rest = &rest[bracket..];
            loop {
                let Some(stripped) = rest.strip_prefix('[') else {
                    if !rest.is_empty() {
                        segments.push(Segment::Invalid(part));
                    }
                    break;
                };
                let Some(close) = stripped.find(']') else {
                    segments.push(Segment::Invalid(part));
                    break;
                };
                match &stripped[..close] {
                    "*" => segments.push(Segment::Wildcard),
                    text => match text.parse::<usize>() {
                        Ok(index) => segments.push(Segment::Index(index)),
                        Err(_) => {
                            segments.push(Segment::Invalid(part));
                            break;
                        }
                    },
                }
                rest = &stripped[close + 1..];
            }
        } else {
            segments.push(Segment::Key(rest));
        }
    }
    segments
}

/// Short single-line rendering of a JSON value for detail messages.
fn preview(value: &Value) -> String {
    const MAX: usize = 60;
    let rendered = value.to_string();
    if rendered.chars().count() > MAX {
        let truncated: String = rendered.chars().take(MAX).collect();
        format!("{truncated}...")
    } else {
        rendered
    }
}
