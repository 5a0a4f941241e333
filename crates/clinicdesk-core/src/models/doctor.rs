use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A doctor as returned by the backend.
///
/// The payload is stored verbatim; the accessors only read fields the admin
/// view knows how to display and return `None` when they are missing or of
/// an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorRecord(Value);

impl DoctorRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Backend id (`_id`), falling back to `id`. Numeric ids are rendered as text.
    pub fn id(&self) -> Option<String> {
        ["_id", "id"].iter().find_map(|key| match self.0.get(*key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    pub fn speciality(&self) -> Option<&str> {
        self.str_field("speciality")
    }

    pub fn degree(&self) -> Option<&str> {
        self.str_field("degree")
    }

    pub fn experience(&self) -> Option<&str> {
        self.str_field("experience")
    }

    pub fn available(&self) -> Option<bool> {
        self.0.get("available").and_then(Value::as_bool)
    }

    pub fn fees(&self) -> Option<f64> {
        self.0.get("fees").and_then(Value::as_f64)
    }

    /// Name for list display, falling back to the id.
    pub fn display_name(&self) -> String {
        self.name()
            .map(str::to_string)
            .or_else(|| self.id())
            .unwrap_or_else(|| "(unnamed)".to_string())
    }

    pub fn availability_display(&self) -> &'static str {
        match self.available() {
            Some(true) => "Available",
            Some(false) => "Unavailable",
            None => "-",
        }
    }

    /// Case-insensitive match against name, speciality and email.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        [self.name(), self.speciality(), self.email()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

impl From<Value> for DoctorRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DoctorRecord {
        DoctorRecord::new(json!({
            "_id": "66a1f0c2",
            "name": "Dr. Richard James",
            "email": "richard@example.com",
            "speciality": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "available": true,
            "fees": 50
        }))
    }

    #[test]
    fn test_accessors() {
        let doc = sample();
        assert_eq!(doc.id().as_deref(), Some("66a1f0c2"));
        assert_eq!(doc.name(), Some("Dr. Richard James"));
        assert_eq!(doc.speciality(), Some("General physician"));
        assert_eq!(doc.degree(), Some("MBBS"));
        assert_eq!(doc.experience(), Some("4 Years"));
        assert_eq!(doc.available(), Some(true));
        assert_eq!(doc.fees(), Some(50.0));
        assert_eq!(doc.availability_display(), "Available");
    }

    #[test]
    fn test_opaque_record_without_known_fields() {
        let doc = DoctorRecord::new(json!({"id": 1}));
        assert_eq!(doc.id().as_deref(), Some("1"));
        assert_eq!(doc.name(), None);
        assert_eq!(doc.display_name(), "1");
        assert_eq!(doc.availability_display(), "-");
    }

    #[test]
    fn test_serde_is_transparent() {
        let raw = json!({"id": 2, "extra": [1, 2, 3]});
        let doc: DoctorRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_matches() {
        let doc = sample();
        assert!(doc.matches(""));
        assert!(doc.matches("richard"));
        assert!(doc.matches("PHYSICIAN"));
        assert!(!doc.matches("dermatologist"));
    }
}
