use super::test_helpers::png_data_uri;
use super::*;
use crate::event::ErrorCode;

#[test]
fn strip_returns_payload_after_marker() {
    assert_eq!(strip_data_uri("data:image/jpeg;base64,QUJD").unwrap(), "QUJD");
}

#[test]
fn strip_ignores_header_contents() {
    assert_eq!(strip_data_uri("base64,QUJD").unwrap(), "QUJD");
    assert_eq!(strip_data_uri("data:image/webp;charset=utf-8;base64,QUJD\n").unwrap(), "QUJD");
}

#[test]
fn empty_string_is_decode_error() {
    assert!(matches!(decode_payload(""), Err(DecodeError::MissingSeparator)));
}

#[test]
fn missing_marker_is_decode_error() {
    assert!(matches!(decode_payload("data:image/png,QUJD"), Err(DecodeError::MissingSeparator)));
    assert!(matches!(decode_payload("QUJD"), Err(DecodeError::MissingSeparator)));
}

#[test]
fn malformed_base64_is_decode_error() {
    let err = decode_payload("data:image/png;base64,@@not*base64@@").unwrap_err();
    assert!(matches!(err, DecodeError::Base64(_)));
    assert_eq!(err.error_code(), "E_DECODE");
}

#[test]
fn valid_payload_decodes_to_bytes() {
    assert_eq!(decode_payload("data:text/plain;base64,QUJD").unwrap(), b"ABC");
}

#[test]
fn wrapped_payload_decodes() {
    assert_eq!(decode_payload("data:text/plain;base64,QUJD\r\nREVG\n").unwrap(), b"ABCDEF");
    assert_eq!(decode_payload("data:text/plain;base64,QU JD\tREVG").unwrap(), b"ABCDEF");
}

#[test]
fn wrapped_png_still_decodes() {
    let uri = png_data_uri(2, 2, [1, 2, 3]);
    let (header, payload) = uri.split_once(BASE64_MARKER).unwrap();
    let wrapped: Vec<String> = payload
        .as_bytes()
        .chunks(16)
        .map(|c| String::from_utf8(c.to_vec()).unwrap())
        .collect();
    let uri = format!("{header}{BASE64_MARKER}{}", wrapped.join("\n"));

    let img = decode_image(&decode_payload(&uri).unwrap()).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
}

#[test]
fn whitespace_does_not_hide_bad_characters() {
    let err = decode_payload("data:image/png;base64,QUJD\n*REVG").unwrap_err();
    assert!(matches!(err, DecodeError::Base64(_)));
}

#[test]
fn non_image_bytes_are_image_format_error() {
    let err = decode_image(b"ABC").unwrap_err();
    assert_eq!(err.error_code(), "E_IMAGE_FORMAT");
    assert!(err.to_string().starts_with("unreadable image"));
}

#[test]
fn png_decodes_to_bgr() {
    let uri = png_data_uri(3, 2, [255, 10, 0]);
    let bytes = decode_payload(&uri).unwrap();
    let img = decode_image(&bytes).unwrap();

    assert_eq!((img.width, img.height), (3, 2));
    assert_eq!(img.data.len(), 3 * 2 * 3);
    for px in img.data.chunks_exact(3) {
        assert_eq!(px, [0, 10, 255]);
    }
}

#[test]
fn gray_alpha_is_expanded_then_swapped() {
    let rgba = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 128]));
    let img = BgrImage::from_dynamic(&image::DynamicImage::ImageRgba8(rgba));
    assert_eq!(img.data, vec![3, 2, 1]);

    let gray = image::GrayImage::from_pixel(2, 1, image::Luma([77]));
    let img = BgrImage::from_dynamic(&image::DynamicImage::ImageLuma8(gray));
    assert_eq!(img.data, vec![77; 6]);
}
