use std::collections::BTreeMap;
use std::path::PathBuf;

use reqwest::multipart::{Form, Part};

use crate::{ClientError, FailureKind};

/// One form submission: where it goes and what it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Absolute URL, or a path resolved against the client's base URL.
    pub target: String,
    pub body: SubmissionBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionBody {
    Json(BTreeMap<String, String>),
    Multipart(Vec<SubmissionPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        path: PathBuf,
    },
}

impl Submission {
    pub fn json(target: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self {
            target: target.into(),
            body: SubmissionBody::Json(fields),
        }
    }

    pub fn multipart(target: impl Into<String>, parts: Vec<SubmissionPart>) -> Self {
        Self {
            target: target.into(),
            body: SubmissionBody::Multipart(parts),
        }
    }
}

pub(crate) async fn build_multipart(parts: &[SubmissionPart]) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            SubmissionPart::Text { name, value } => form.text(name.clone(), value.clone()),
            SubmissionPart::File {
                name,
                file_name,
                path,
            } => {
                let bytes = tokio::fs::read(path).await.map_err(|err| {
                    ClientError::new(FailureKind::Io, format!("{}: {err}", path.display()))
                })?;
                form.part(name.clone(), Part::bytes(bytes).file_name(file_name.clone()))
            }
        };
    }
    Ok(form)
}
