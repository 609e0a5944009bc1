use axum::http::HeaderMap;

const MAX_IP_LEN: usize = 64;

/// Client address as reported by the reverse proxy: the first
/// `X-Forwarded-For` hop, else `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    forwarded_for(headers).or_else(|| header_ip(headers, "x-real-ip"))
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    normalized_ip(raw.split(',').next()?)
}

fn header_ip(headers: &HeaderMap, key: &str) -> Option<String> {
    normalized_ip(headers.get(key)?.to_str().ok()?)
}

fn normalized_ip(raw: &str) -> Option<String> {
    let ip = raw.trim();
    if ip.is_empty() || ip.len() > MAX_IP_LEN {
        return None;
    }
    if ip
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b':' || b == b'-')
    {
        Some(ip.to_string())
    } else {
        None
    }
}

/// Exact `Bearer <secret>` match.
pub fn bearer_matches(header: Option<&str>, secret: &str) -> bool {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret)
}
