use url::Url;

/// Human-readable label for an address, e.g. `My Article - example.com`.
///
/// Falls back to the hostname when the path has no usable segment and to the
/// raw address when it cannot be parsed or decoded.
pub fn derive_title(address: &str) -> String {
    let Ok(url) = Url::parse(address) else {
        return address.to_string();
    };
    let host = url.host_str().unwrap_or_default();
    let hostname = host.strip_prefix("www.").unwrap_or(host);

    let path = url.path();
    if path.is_empty() || path == "/" {
        return hostname.to_string();
    }

    let Some(last) = path.rsplit('/').find(|part| !part.is_empty()) else {
        return hostname.to_string();
    };
    if has_malformed_escape(last) {
        return address.to_string();
    }
    let Ok(decoded) = urlencoding::decode(last) else {
        return address.to_string();
    };

    let stem = strip_extension(&decoded);
    if stem.is_empty() {
        return hostname.to_string();
    }
    let words = stem.replace(['-', '_'], " ");
    format!("{} - {}", capitalize_words(&words), hostname)
}

/// True when some `%` is not followed by two hex digits. `urlencoding` passes
/// such escapes through verbatim instead of rejecting them.
fn has_malformed_escape(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

/// Drops a trailing `.ext` where `ext` is non-empty and holds no `.` or `/`.
fn strip_extension(segment: &str) -> &str {
    match segment.rfind('.') {
        Some(dot) if dot + 1 < segment.len() && !segment[dot + 1..].contains('/') => {
            &segment[..dot]
        }
        _ => segment,
    }
}

/// Upper-cases every ASCII letter that starts a word of ASCII alphanumerics or `_`.
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_word = false;
    for ch in text.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !prev_is_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    out
}
