use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{QrCode, types::QrError};
use serde::Serialize;
use thiserror::Error;

const MIN_DIMENSION: u32 = 200;

#[derive(Debug, Error)]
pub enum QrEncodeError {
    #[error("serialize qr payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("encode qr code: {0}")]
    Qr(#[from] QrError),

    #[error("render qr image: {0}")]
    Image(#[from] image::ImageError),
}

/// Ticket summary carried inside the QR code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload<'a> {
    pub ticket_id: &'a str,
    pub event: &'a str,
    pub num_tickets: i64,
    pub name: &'a str,
    pub email: &'a str,
    pub date: DateTime<Utc>,
}

/// Encode the payload as a PNG QR code wrapped in a `data:` URL.
///
/// Identical payloads produce identical images. Payloads too large for a QR
/// code fail instead of being truncated.
pub fn encode_data_url(payload: &QrPayload<'_>) -> Result<String, QrEncodeError> {
    let json = serde_json::to_vec(payload)?;
    let png = render_png(&json)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

fn render_png(data: &[u8]) -> Result<Vec<u8>, QrEncodeError> {
    let code = QrCode::new(data)?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload<'a>(name: &'a str) -> QrPayload<'a> {
        QrPayload {
            ticket_id: "TKT-1767225600000-ABCDEFGHI",
            event: "Summer Music Festival",
            num_tickets: 2,
            name,
            email: "a@b.com",
            date: DateTime::from_timestamp(1_767_225_600, 0).unwrap(),
        }
    }

    #[test]
    fn encodes_png_data_url_deterministically() {
        let first = encode_data_url(&payload("A")).unwrap();
        let second = encode_data_url(&payload("A")).unwrap();
        assert!(first.starts_with("data:image/png;base64,"));
        assert_eq!(first, second);

        let png = STANDARD
            .decode(first.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let huge = "x".repeat(8_000);
        let err = encode_data_url(&payload(&huge)).unwrap_err();
        assert!(matches!(err, QrEncodeError::Qr(QrError::DataTooLong)));
    }
}
