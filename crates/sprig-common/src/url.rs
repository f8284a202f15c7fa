//! URL resolution utilities.
//!
//! [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
//! [URL Standard](https://url.spec.whatwg.org/)

/// Resolve a potentially relative URL against the URL of the current document.
///
/// # Algorithm
///
/// STEP 1: If `href` contains a scheme separator (`://`) or is a `data:` URL,
///         it is already absolute.
///
/// STEP 2: A protocol-relative `//host/path` borrows the scheme of the base.
///
/// STEP 3: A host-relative `/path` is joined to the base's `scheme://host`.
///
/// STEP 4: Anything else is joined to the base's directory. Each leading `../`
///         removes one directory, but never climbs above the host.
///
/// NOTE: This is a simplified implementation. Full URL resolution requires
/// implementing the URL Standard's URL parsing algorithm.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1
    if href.contains("://") || href.starts_with("data:") {
        return href.to_string();
    }

    let Some(base) = base_url else {
        return href.to_string();
    };

    let Some(scheme_end) = base.find("://") else {
        return href.to_string();
    };
    let scheme = &base[..scheme_end];
    let after_scheme = &base[scheme_end + 3..];
    let origin_len = after_scheme.find('/').map_or(base.len(), |i| scheme_end + 3 + i);
    let origin = &base[..origin_len];

    // STEP 2
    if let Some(rest) = href.strip_prefix("//") {
        return format!("{scheme}://{rest}");
    }

    // STEP 3
    if href.starts_with('/') {
        return format!("{origin}{href}");
    }

    // STEP 4
    let mut dir = if origin_len == base.len() {
        origin
    } else {
        base.rsplit_once('/').map_or(origin, |(dir, _)| dir)
    };
    let mut relative = href;
    while let Some(rest) = relative.strip_prefix("../") {
        relative = rest;
        if dir.len() > origin.len() {
            dir = dir.rsplit_once('/').map_or(origin, |(parent, _)| parent);
        }
    }
    if let Some(rest) = relative.strip_prefix("./") {
        relative = rest;
    }
    format!("{dir}/{relative}")
}
