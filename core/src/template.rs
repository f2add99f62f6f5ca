//! URL path templates such as `organizations/{organizationId}`.
//!
//! Placeholders are filled from a parameter map and removed from it; whatever
//! is left over becomes the query string of the request.

use std::collections::BTreeMap;

use crate::error::{ApiError, Result};

/// Path and query parameters. Ordered so generated URLs are deterministic.
pub type Params = BTreeMap<String, String>;

/// Expand `template` into path segments, consuming the parameters it names.
///
/// Segment values are returned unencoded; the URL builder percent-encodes
/// them when they are appended.
pub fn expand_path(template: &str, params: &mut Params) -> Result<Vec<String>> {
    template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| expand_segment(template, segment, params))
        .collect()
}

fn expand_segment(template: &str, segment: &str, params: &mut Params) -> Result<String> {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;

    while let Some(open) = rest.find(['{', '}']) {
        if rest.as_bytes()[open] == b'}' {
            return Err(ApiError::InvalidPathTemplate(template.to_string()));
        }
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ApiError::InvalidPathTemplate(template.to_string()))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(ApiError::InvalidPathTemplate(template.to_string()));
        }
        let value = params
            .remove(name)
            .ok_or_else(|| ApiError::UnresolvedPathParameter {
                name: name.to_string(),
                template: template.to_string(),
            })?;
        out.push_str(&value);
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
