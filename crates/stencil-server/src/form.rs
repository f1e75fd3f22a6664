//! Multipart form handling
//!
//! Both endpoints accept the same form: an image `file` part plus the
//! stencil parameters as text fields.

use axum::extract::Multipart;
use stencil_core::{
    FilterKind, MarginSpec, Orientation, StencilOptions, height_for_aspect, image_dimensions,
    is_image_content_type,
};

use crate::error::ApiError;

/// A validated stencil request
#[derive(Debug)]
pub struct StencilRequest {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub options: StencilOptions,
}

/// Form fields as received, before interpretation
#[derive(Debug, Default)]
pub struct RawForm {
    pub file: Option<(Vec<u8>, String)>,
    pub target_width_cm: Option<String>,
    pub target_height_cm: Option<String>,
    pub filter_type: Option<String>,
    pub orientation: Option<String>,
    pub add_margins: Option<String>,
    pub margin_x_cm: Option<String>,
    pub margin_y_cm: Option<String>,
}

impl RawForm {
    /// Drain a multipart body into its fields
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = RawForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "file" {
                let content_type = field.content_type().unwrap_or_default().to_string();
                // Reject before buffering the whole part
                if !is_image_content_type(&content_type) {
                    return Err(ApiError::UnsupportedMediaType(content_type));
                }
                let bytes = field.bytes().await?;
                form.file = Some((bytes.to_vec(), content_type));
                continue;
            }

            let slot = match name.as_str() {
                "target_width_cm" => &mut form.target_width_cm,
                "target_height_cm" => &mut form.target_height_cm,
                "filter_type" | "filter" => &mut form.filter_type,
                "orientation" => &mut form.orientation,
                "add_margins" => &mut form.add_margins,
                "margin_x_cm" => &mut form.margin_x_cm,
                "margin_y_cm" => &mut form.margin_y_cm,
                other => {
                    tracing::debug!("Ignoring unknown form field '{}'", other);
                    continue;
                }
            };
            *slot = Some(field.text().await?);
        }

        Ok(form)
    }

    /// Interpret the fields.
    ///
    /// A missing `target_height_cm` is derived from the image's aspect ratio.
    pub fn into_request(self, strict_filters: bool) -> Result<StencilRequest, ApiError> {
        let (bytes, content_type) = self
            .file
            .ok_or_else(|| ApiError::invalid_input("Missing 'file' upload"))?;
        if !is_image_content_type(&content_type) {
            return Err(ApiError::UnsupportedMediaType(content_type));
        }

        let target_width_cm = parse_number("target_width_cm", self.target_width_cm.as_deref())?
            .ok_or_else(|| ApiError::invalid_input("Missing 'target_width_cm'"))?;
        let target_height_cm =
            match parse_number("target_height_cm", self.target_height_cm.as_deref())? {
                Some(height) => height,
                None => height_for_aspect(target_width_cm, image_dimensions(&bytes, &content_type)?),
            };

        let filter = FilterKind::parse(self.filter_type.as_deref().unwrap_or(""), strict_filters)?;
        let orientation = Orientation::parse(self.orientation.as_deref().unwrap_or(""))?;

        let margins = if parse_bool("add_margins", self.add_margins.as_deref())? {
            Some(MarginSpec::new(
                parse_number("margin_x_cm", self.margin_x_cm.as_deref())?.unwrap_or(0.0),
                parse_number("margin_y_cm", self.margin_y_cm.as_deref())?.unwrap_or(0.0),
            ))
        } else {
            None
        };

        let options = StencilOptions {
            target_width_cm,
            target_height_cm,
            filter,
            orientation,
            margins,
        };
        options.validate()?;

        Ok(StencilRequest {
            bytes,
            content_type,
            options,
        })
    }
}

/// Parse an optional decimal field; blank counts as absent
fn parse_number(name: &str, value: Option<&str>) -> Result<Option<f64>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ApiError::invalid_input(format!("'{}' must be a number, got '{}'", name, text))),
    }
}

/// Parse an HTML-form style boolean; absent is false
fn parse_bool(name: &str, value: Option<&str>) -> Result<bool, ApiError> {
    let Some(text) = value else {
        return Ok(false);
    };
    match text.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "off" | "no" => Ok(false),
        "true" | "1" | "on" | "yes" => Ok(true),
        other => Err(ApiError::invalid_input(format!(
            "'{}' must be true or false, got '{}'",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn form() -> RawForm {
        RawForm {
            file: Some((png(20, 10), "image/png".to_string())),
            target_width_cm: Some("42".to_string()),
            target_height_cm: Some("29.7".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_form() {
        let request = form().into_request(false).unwrap();
        assert_eq!(request.content_type, "image/png");
        assert_eq!(request.options.target_width_cm, 42.0);
        assert_eq!(request.options.target_height_cm, 29.7);
        assert_eq!(request.options.filter, FilterKind::None);
        assert_eq!(request.options.orientation, Orientation::Portrait);
        assert!(request.options.margins.is_none());
    }

    #[test]
    fn test_full_form() {
        let raw = RawForm {
            filter_type: Some("bw".to_string()),
            orientation: Some("landscape".to_string()),
            add_margins: Some("on".to_string()),
            margin_x_cm: Some("1.5".to_string()),
            ..form()
        };
        let options = raw.into_request(false).unwrap().options;
        assert_eq!(options.filter, FilterKind::Grayscale);
        assert_eq!(options.orientation, Orientation::Landscape);
        assert_eq!(options.margins, Some(MarginSpec::new(1.5, 0.0)));
    }

    #[test]
    fn test_margins_ignored_when_disabled() {
        let raw = RawForm {
            add_margins: Some("false".to_string()),
            margin_x_cm: Some("3".to_string()),
            ..form()
        };
        assert!(raw.into_request(false).unwrap().options.margins.is_none());
    }

    #[test]
    fn test_height_from_aspect_ratio() {
        let raw = RawForm {
            target_height_cm: None,
            ..form()
        };
        let options = raw.into_request(false).unwrap().options;
        assert!((options.target_height_cm - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejections() {
        let missing_file = RawForm {
            file: None,
            ..form()
        };
        assert_eq!(
            missing_file.into_request(false).unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );

        let text_upload = RawForm {
            file: Some((b"hello".to_vec(), "text/plain".to_string())),
            ..form()
        };
        assert_eq!(
            text_upload.into_request(false).unwrap_err().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );

        let bad_width = RawForm {
            target_width_cm: Some("wide".to_string()),
            ..form()
        };
        assert_eq!(bad_width.into_request(false).unwrap_err().kind(), "invalid_input");

        let zero_width = RawForm {
            target_width_cm: Some("0".to_string()),
            ..form()
        };
        assert_eq!(zero_width.into_request(false).unwrap_err().kind(), "invalid_dimension");

        let bad_orientation = RawForm {
            orientation: Some("sideways".to_string()),
            ..form()
        };
        assert_eq!(
            bad_orientation.into_request(false).unwrap_err().kind(),
            "invalid_input"
        );
    }

    #[test]
    fn test_unknown_filter_strictness() {
        let sepia = || RawForm {
            filter_type: Some("sepia".to_string()),
            ..form()
        };
        assert_eq!(sepia().into_request(false).unwrap().options.filter, FilterKind::None);
        assert_eq!(
            sepia().into_request(true).unwrap_err().kind(),
            "unsupported_filter"
        );
    }

    #[test]
    fn test_parse_bool_values() {
        for value in ["true", "1", "ON", "yes"] {
            assert!(parse_bool("b", Some(value)).unwrap());
        }
        for value in ["false", "0", "off", "No", ""] {
            assert!(!parse_bool("b", Some(value)).unwrap());
        }
        assert!(!parse_bool("b", None).unwrap());
        assert!(parse_bool("b", Some("maybe")).is_err());
    }
}
