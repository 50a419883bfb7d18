use serde_json::Value;

use super::method::HttpMethod;

/// One named test call: where to send it and which status proves success.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub name: String,
    pub method: HttpMethod,
    /// Path below `/api/`; may contain `{{var}}` placeholders.
    pub endpoint: String,
    pub expected_status: u16,
    pub body: Option<Value>,
    pub params: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn get(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, endpoint)
    }

    pub fn post(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Post, endpoint)
    }

    fn new(name: impl Into<String>, method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            endpoint: endpoint.into(),
            expected_status: 200,
            body: None,
            params: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn expect(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}
