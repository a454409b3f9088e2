use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use thiserror::Error;

use crate::crop::CropRegion;
use crate::ops::{FilterIntensity, Operation, map_factor, map_hue, map_intensity};

/// Per-action failures surfaced to the user. None of these are retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Please select an image first!")]
    NoImageSelected,
    #[error(
        "Please enter valid cropping coordinates (width and height must be positive, and coordinates non-negative)."
    )]
    InvalidCropRegion,
    #[error("{0}")]
    BackendRejected(String),
    #[error("Could not reach the backend: {0}")]
    TransportFailure(String),
}

/// A fully validated request: endpoint plus the operation's text fields.
/// The image part is attached at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub endpoint: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

/// Validates preconditions and maps UI values to backend fields for one
/// operation. Pure; no IO.
pub fn build_request(
    op: Operation,
    has_image: bool,
    crop: CropRegion,
    intensity: &FilterIntensity,
) -> Result<OperationRequest, ApiError> {
    if !has_image {
        return Err(ApiError::NoImageSelected);
    }

    let fields = match op {
        Operation::RemoveBackground | Operation::InvertColors => Vec::new(),
        Operation::Crop { circular } => {
            // Circular crops go out unvalidated; the backend clamps the region.
            if !circular && !crop.is_complete() {
                return Err(ApiError::InvalidCropRegion);
            }
            vec![
                ("x", crop.x.to_string()),
                ("y", crop.y.to_string()),
                ("width", crop.width.to_string()),
                ("height", crop.height.to_string()),
                ("circular", if circular { "true" } else { "false" }.to_string()),
            ]
        }
        Operation::Sharpen => vec![(
            "intensity",
            map_intensity(intensity.sharpening).to_string(),
        )],
        Operation::BlackAndWhite => vec![(
            "intensity",
            map_intensity(intensity.black_and_white).to_string(),
        )],
        Operation::Hue => vec![("hue_shift", map_hue(intensity.hue).to_string())],
        Operation::Contrast => vec![("factor", map_factor(intensity.contrast).to_string())],
        Operation::Saturation => {
            vec![("factor", map_factor(intensity.saturation).to_string())]
        }
    };

    Ok(OperationRequest {
        endpoint: op.endpoint(),
        fields,
    })
}

/// 2xx means the body is the processed image; anything else carries a JSON
/// `{"error": ...}` payload when the backend got far enough to produce one.
pub fn classify_response(status: u16, body: Vec<u8>) -> Result<Vec<u8>, ApiError> {
    if (200..300).contains(&status) {
        return Ok(body);
    }
    let message = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| format!("Request failed (HTTP {status})"));
    Err(ApiError::BackendRejected(message))
}

/// Sends the multipart POST and classifies the outcome. Blocking; run on a
/// background thread.
pub fn dispatch(
    base_url: &str,
    request: &OperationRequest,
    file_name: &str,
    image_bytes: Vec<u8>,
) -> Result<Vec<u8>, ApiError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| ApiError::TransportFailure(e.to_string()))?;

    let mut form = Form::new().part(
        "image",
        Part::bytes(image_bytes).file_name(file_name.to_owned()),
    );
    for (name, value) in &request.fields {
        form = form.text(*name, value.clone());
    }

    let url = format!("{}{}", base_url.trim_end_matches('/'), request.endpoint);
    tracing::debug!(%url, "dispatching operation");

    let response = client
        .post(&url)
        .multipart(form)
        .send()
        .map_err(|e| ApiError::TransportFailure(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .bytes()
        .map_err(|e| ApiError::TransportFailure(e.to_string()))?;
    classify_response(status, body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intensity() -> FilterIntensity {
        FilterIntensity::default()
    }

    #[test]
    fn every_operation_requires_an_image() {
        let ops = [
            Operation::RemoveBackground,
            Operation::Crop { circular: false },
            Operation::Sharpen,
            Operation::BlackAndWhite,
            Operation::Hue,
            Operation::Contrast,
            Operation::Saturation,
            Operation::InvertColors,
        ];
        for op in ops {
            let out = build_request(op, false, CropRegion::full(10, 10), &intensity());
            assert_eq!(out, Err(ApiError::NoImageSelected), "{op:?}");
        }
    }

    #[test]
    fn rectangular_crop_rejects_incomplete_regions() {
        let region = CropRegion {
            x: 5,
            y: 5,
            width: 0,
            height: 20,
        };
        let out = build_request(
            Operation::Crop { circular: false },
            true,
            region,
            &intensity(),
        );
        assert_eq!(out, Err(ApiError::InvalidCropRegion));
    }

    #[test]
    fn crop_fields_carry_region_and_mode() {
        let region = CropRegion {
            x: 10,
            y: 30,
            width: 40,
            height: 20,
        };
        let req = build_request(Operation::Crop { circular: true }, true, region, &intensity())
            .unwrap();
        assert_eq!(req.endpoint, "/crop-image");
        assert_eq!(
            req.fields,
            vec![
                ("x", "10".to_string()),
                ("y", "30".to_string()),
                ("width", "40".to_string()),
                ("height", "20".to_string()),
                ("circular", "true".to_string()),
            ]
        );
    }

    #[test]
    fn contrast_slider_at_75_sends_factor_1_5() {
        let mut i = intensity();
        i.contrast = 75;
        let req = build_request(Operation::Contrast, true, CropRegion::default(), &i).unwrap();
        assert_eq!(req.endpoint, "/adjust-contrast");
        assert_eq!(req.fields, vec![("factor", "1.5".to_string())]);
    }

    #[test]
    fn hue_slider_midpoint_sends_zero_shift() {
        let mut i = intensity();
        i.hue = 50;
        let req = build_request(Operation::Hue, true, CropRegion::default(), &i).unwrap();
        assert_eq!(req.fields, vec![("hue_shift", "0".to_string())]);
    }

    #[test]
    fn parameterless_operations_send_only_the_image() {
        for op in [Operation::RemoveBackground, Operation::InvertColors] {
            let req = build_request(op, true, CropRegion::default(), &intensity()).unwrap();
            assert!(req.fields.is_empty());
        }
    }

    #[test]
    fn success_status_returns_the_body() {
        let body = vec![0x89, b'P', b'N', b'G'];
        assert_eq!(classify_response(200, body.clone()), Ok(body));
    }

    #[test]
    fn error_body_message_is_preferred() {
        let body = br#"{"error": "boom"}"#.to_vec();
        assert_eq!(
            classify_response(500, body),
            Err(ApiError::BackendRejected("boom".to_string()))
        );
    }

    #[test]
    fn malformed_error_body_falls_back_to_status() {
        assert_eq!(
            classify_response(502, b"<html>bad gateway</html>".to_vec()),
            Err(ApiError::BackendRejected(
                "Request failed (HTTP 502)".to_string()
            ))
        );
    }

    mod stub_backend {
        use super::*;
        use std::io::{Read, Write};
        use std::net::TcpListener;
        use std::sync::mpsc;

        /// One-shot HTTP responder capturing the raw request it receives.
        fn spawn(
            status_line: &'static str,
            content_type: &'static str,
            body: &'static [u8],
        ) -> (String, mpsc::Receiver<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            let (tx, rx) = mpsc::channel();

            std::thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];

                let header_end = loop {
                    let n = stream.read(&mut chunk).unwrap();
                    if n == 0 {
                        break buf.len();
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        break pos + 4;
                    }
                };

                let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
                let content_length: usize = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0);
                while buf.len() < header_end + content_length {
                    let n = stream.read(&mut chunk).unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }

                let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());

                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.write_all(body);
            });

            (format!("http://{addr}"), rx)
        }

        #[test]
        fn contrast_at_75_sends_factor_1_5_to_the_backend() {
            let (base, rx) = spawn("200 OK", "image/png", b"PNGDATA");
            let mut i = FilterIntensity::default();
            i.contrast = 75;
            let req =
                build_request(Operation::Contrast, true, CropRegion::default(), &i).unwrap();

            let out = dispatch(&base, &req, "photo.png", b"raw image bytes".to_vec()).unwrap();
            assert_eq!(out, b"PNGDATA");

            let captured = rx.recv_timeout(Duration::from_secs(10)).unwrap();
            assert!(captured.starts_with("POST /adjust-contrast HTTP/1.1"));
            assert!(captured.contains("name=\"factor\""));
            assert!(captured.contains("1.5"));
            assert!(captured.contains("name=\"image\""));
            assert!(captured.contains("filename=\"photo.png\""));
            assert_eq!(
                Operation::Contrast.download_filename(),
                "kreate_contrast_adjusted.png"
            );
        }

        #[test]
        fn backend_error_body_is_surfaced() {
            let (base, _rx) = spawn(
                "500 INTERNAL SERVER ERROR",
                "application/json",
                br#"{"error": "boom"}"#,
            );
            let req = build_request(
                Operation::Sharpen,
                true,
                CropRegion::default(),
                &FilterIntensity::default(),
            )
            .unwrap();

            let out = dispatch(&base, &req, "photo.png", vec![1, 2, 3]);
            assert_eq!(out, Err(ApiError::BackendRejected("boom".to_string())));
        }

        #[test]
        fn unreachable_backend_is_a_transport_failure() {
            // Grab a free port, then close the listener before dispatching.
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            drop(listener);

            let req = build_request(
                Operation::InvertColors,
                true,
                CropRegion::default(),
                &FilterIntensity::default(),
            )
            .unwrap();
            match dispatch(&base, &req, "photo.png", vec![1]) {
                Err(ApiError::TransportFailure(_)) => {}
                other => panic!("expected a transport failure, got {other:?}"),
            }
        }
    }
}
