//! Structural text emitters.
//!
//! A [`TextSink`] is append-only: it neither validates nor backtracks. When
//! a serialize call fails the buffer may hold a partial document; callers
//! discard it.

/// Structural writer driven by the serializer.
pub trait TextSink {
    fn open_object(&mut self);
    fn close_object(&mut self);
    fn open_array(&mut self);
    fn close_array(&mut self);
    /// Write an object member name. Member separators are the sink's concern.
    fn property_name(&mut self, name: &str);
    fn string(&mut self, value: &str);
    fn integer(&mut self, value: i64);
    fn double(&mut self, value: f64);
    fn boolean(&mut self, value: bool);
    fn null(&mut self);
    /// Write a single array element separator.
    fn separator(&mut self);
}

/// Compact JSON sink.
///
/// Commas between object members are inserted automatically; array element
/// separators are written only when [`TextSink::separator`] is called, so
/// the serializer alone decides how array elements are joined.
#[derive(Debug, Default)]
pub struct JsonWriter {
    buf: String,
    /// One entry per open object: whether a member has been written.
    members: Vec<bool>,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl TextSink for JsonWriter {
    fn open_object(&mut self) {
        self.buf.push('{');
        self.members.push(false);
    }

    fn close_object(&mut self) {
        self.members.pop();
        self.buf.push('}');
    }

    fn open_array(&mut self) {
        self.buf.push('[');
    }

    fn close_array(&mut self) {
        self.buf.push(']');
    }

    fn property_name(&mut self, name: &str) {
        if let Some(written) = self.members.last_mut() {
            if *written {
                self.buf.push(',');
            }
            *written = true;
        }
        self.string(name);
        self.buf.push(':');
    }

    fn string(&mut self, value: &str) {
        // Display on a JSON string value never fails and handles escaping.
        self.buf
            .push_str(&serde_json::Value::String(value.to_owned()).to_string());
    }

    fn integer(&mut self, value: i64) {
        self.buf.push_str(&value.to_string());
    }

    fn double(&mut self, value: f64) {
        // Non-finite doubles render as null.
        self.buf.push_str(&serde_json::Value::from(value).to_string());
    }

    fn boolean(&mut self, value: bool) {
        self.buf.push_str(if value { "true" } else { "false" });
    }

    fn null(&mut self) {
        self.buf.push_str("null");
    }

    fn separator(&mut self) {
        self.buf.push(',');
    }
}
