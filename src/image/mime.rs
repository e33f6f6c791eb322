//! Content sniffing for bare base64 uploads, which carry no declared type.

/// Leading-byte signatures of the formats the video model accepts.
const SIGNATURES: &[(&[u8], &str)] = &[
    (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
    (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
];

/// MIME type of `bytes`, or `None` when they are not a recognized image.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    // RIFF....WEBP has a length field in the middle.
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_png() {
        assert_eq!(
            sniff_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some("image/png")
        );
    }

    #[test]
    fn test_sniff_jpeg() {
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
    }

    #[test]
    fn test_sniff_webp() {
        assert_eq!(
            sniff_image_mime(b"RIFF\x10\x00\x00\x00WEBPVP8 "),
            Some("image/webp")
        );
        assert_eq!(sniff_image_mime(b"RIFF\x10\x00\x00\x00WAVEfmt "), None);
    }

    #[test]
    fn test_sniff_gif() {
        assert_eq!(sniff_image_mime(b"GIF89a\x01\x00"), Some("image/gif"));
    }

    #[test]
    fn test_unrecognized_bytes() {
        assert_eq!(sniff_image_mime(b"%PDF-1.7"), None);
        assert_eq!(sniff_image_mime(&[0x89, 0x50]), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sniff_image_mime(&[]), None);
    }
}
