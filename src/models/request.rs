use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::header,
};

use crate::error::{DispatchError, DispatchResult};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Raw form fields of a `POST /send` request.
///
/// Ids stay as strings here so that a missing or malformed id surfaces as a
/// validation error from the pipeline instead of an extractor rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRequest {
    pub from_id: String,
    pub to_id: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub from_id: i64,
    pub to_id: i64,
    pub message: String,
}

impl DispatchRequest {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            message: message.map(str::to_string),
        }
    }

    /// Builds a request from decoded form pairs. The first value of a
    /// repeated key wins; unknown keys are ignored.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut from_id = None;
        let mut to_id = None;
        let mut message = None;

        for (name, value) in fields {
            let slot = match name.as_str() {
                "fromID" => &mut from_id,
                "toID" => &mut to_id,
                "message" => &mut message,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        Self {
            from_id: from_id.unwrap_or_default(),
            to_id: to_id.unwrap_or_default(),
            message,
        }
    }

    pub fn parse(self) -> DispatchResult<ParsedRequest> {
        let from_id = parse_id("fromID", &self.from_id)?;
        let to_id = parse_id("toID", &self.to_id)?;

        Ok(ParsedRequest {
            from_id,
            to_id,
            message: self.message.unwrap_or_default(),
        })
    }
}

fn parse_id(field: &'static str, value: &str) -> DispatchResult<i64> {
    value
        .parse::<i64>()
        .map_err(|source| DispatchError::Validation {
            field,
            value: value.to_string(),
            source,
        })
}

/// Reads url-encoded and multipart bodies. Any other content type yields no
/// fields, which the pipeline then reports as a missing `fromID`.
impl<S> FromRequest<S> for DispatchRequest
where
    S: Send + Sync,
{
    type Rejection = DispatchError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with(FORM_URLENCODED) {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| DispatchError::MalformedBody(e.body_text()))?;

            return Ok(Self::from_fields(fields));
        }

        if content_type.starts_with(MULTIPART_FORM_DATA) {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| DispatchError::MalformedBody(e.body_text()))?;

            let mut fields = Vec::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| DispatchError::MalformedBody(e.body_text()))?
            {
                // File parts are not form values.
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let value = field
                    .text()
                    .await
                    .map_err(|e| DispatchError::MalformedBody(e.body_text()))?;
                fields.push((name, value));
            }

            return Ok(Self::from_fields(fields));
        }

        Ok(Self::default())
    }
}
