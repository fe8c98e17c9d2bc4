use std::collections::BTreeMap;
use std::path::PathBuf;

pub type FormId = u64;
pub type TaskId = String;

/// Marker class opting a form into submit interception.
pub const TOOLKIT_FORM_CLASS: &str = "toolkit-form";
/// Marker class for forms whose fields are sent as a JSON object.
pub const URL_FORM_CLASS: &str = "url-form";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(SelectedFile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file: SelectedFile) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::File(file),
        }
    }
}

/// Static description of a form as it appears on the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormDescriptor {
    pub id: FormId,
    pub classes: Vec<String>,
    pub action: Option<String>,
    /// `data-action` override, used when `action` is absent.
    pub data_action: Option<String>,
    /// Label of the submit control; `None` when the form has no such control.
    pub submit_label: Option<String>,
    pub has_progress: bool,
    pub has_result: bool,
}

impl FormDescriptor {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_toolkit_form(&self) -> bool {
        self.has_class(TOOLKIT_FORM_CLASS)
    }

    pub fn is_url_form(&self) -> bool {
        self.has_class(URL_FORM_CLASS)
    }

    /// Endpoint the form posts to.
    pub fn target(&self) -> Option<&str> {
        non_empty(self.action.as_deref()).or_else(|| non_empty(self.data_action.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPayload {
    Json(BTreeMap<String, String>),
    Multipart(Vec<FormField>),
}

/// Serializes form fields for the wire.
///
/// URL forms become a flat JSON object of their text fields (the last value
/// wins for repeated names). Every other form is sent as multipart data.
pub fn build_payload(form: &FormDescriptor, fields: Vec<FormField>) -> SubmitPayload {
    if !form.is_url_form() {
        return SubmitPayload::Multipart(fields);
    }

    let mut object = BTreeMap::new();
    for field in fields {
        match field.value {
            FieldValue::Text(value) => {
                object.insert(field.name, value);
            }
            FieldValue::File(file) => {
                toolkit_logging::toolkit_debug!(
                    "Skipping file field {} ({}) in JSON submission",
                    field.name,
                    file.name
                );
            }
        }
    }
    SubmitPayload::Json(object)
}

/// Reply body of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplyFields {
    pub task_id: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ReplyFields {
    pub fn task_id(&self) -> Option<&str> {
        non_empty(self.task_id.as_deref())
    }

    pub fn error(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        non_empty(self.message.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
