use serde_json::Value;

/// Number of characters of a body echoed to the console.
pub const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub duration_ms: u128,
    pub body: String,
}

impl ProbeResponse {
    /// Parsed body, or `None` when it is not JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// First `PREVIEW_CHARS` characters of `text`, cut on a char boundary.
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Pretty-printed JSON truncated for the console.
pub fn preview_json(value: &Value) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    preview(&pretty).to_string()
}
