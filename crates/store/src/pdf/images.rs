//! JPEG image XObjects
//!
//! Captured pages arrive as JPEG bytes and are embedded unchanged with the
//! `DCTDecode` filter; only the frame header is parsed, for dimensions and
//! the component count.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfError, Result};

/// A validated baseline or progressive JPEG
#[derive(Debug, Clone, PartialEq)]
pub struct JpegImage {
    pub width: u32,
    pub height: u32,
    /// 1 (gray), 3 (RGB) or 4 (CMYK)
    pub components: u8,
    data: Vec<u8>,
}

impl JpegImage {
    /// Parse the frame header; fails on anything that is not a usable JPEG
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        let frame = parse_frame_header(&data)?;
        if frame.width == 0 || frame.height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "JPEG has empty dimensions {}x{}",
                frame.width, frame.height
            )));
        }
        Ok(Self {
            width: frame.width,
            height: frame.height,
            components: frame.components,
            data,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }

    /// Image XObject stream
    pub fn to_xobject(&self) -> PdfStream {
        let mut dict = PdfDictionary::typed("XObject")
            .with("Subtype", PdfObject::name("Image"))
            .with("Width", self.width)
            .with("Height", self.height)
            .with("BitsPerComponent", 8i64)
            .with("ColorSpace", PdfObject::name(self.color_space()));
        if self.components == 4 {
            // Adobe CMYK JPEGs are stored inverted
            dict.insert(
                "Decode",
                vec![1i64, 0, 1, 0, 1, 0, 1, 0]
                    .into_iter()
                    .map(PdfObject::Integer)
                    .collect::<Vec<_>>(),
            );
        }
        PdfStream::encoded(dict, self.data.clone(), "DCTDecode")
    }
}

struct FrameHeader {
    width: u32,
    height: u32,
    components: u8,
}

fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

fn parse_frame_header(data: &[u8]) -> Result<FrameHeader> {
    let invalid = |msg: &str| PdfError::InvalidImage(msg.to_string());

    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(invalid("missing JPEG start-of-image marker"));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(invalid("corrupt JPEG marker stream"));
        }
        // Fill bytes
        while pos + 1 < data.len() && data[pos + 1] == 0xFF {
            pos += 1;
        }
        let Some(&marker) = data.get(pos + 1) else {
            break;
        };
        pos += 2;

        if marker == 0xD8 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            continue;
        }
        if marker == 0xD9 || marker == 0xDA {
            // End of image or start of scan before any frame header
            break;
        }

        let Some(segment) = data.get(pos..pos + 2) else {
            break;
        };
        let length = usize::from(u16::from_be_bytes([segment[0], segment[1]]));
        if length < 2 {
            return Err(invalid("JPEG segment length too small"));
        }

        if is_start_of_frame(marker) {
            let header = data
                .get(pos..pos + 8)
                .ok_or_else(|| invalid("truncated JPEG frame header"))?;
            return Ok(FrameHeader {
                height: u32::from(u16::from_be_bytes([header[3], header[4]])),
                width: u32::from(u16::from_be_bytes([header[5], header[6]])),
                components: header[7],
            });
        }
        pos += length;
    }

    Err(invalid("no frame header found in JPEG"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::{ExtendedColorType, ImageEncoder, RgbImage};

    /// Encode a flat-colour JPEG of the given size
    pub(crate) fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 85)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    #[test]
    fn test_parse_dimensions() {
        let jpeg = JpegImage::parse(sample_jpeg(24, 32)).unwrap();
        assert_eq!((jpeg.width, jpeg.height), (24, 32));
        assert_eq!(jpeg.components, 3);
        assert_eq!(jpeg.color_space(), "DeviceRGB");
    }

    #[test]
    fn test_rejects_non_jpeg() {
        assert!(matches!(
            JpegImage::parse(b"\x89PNG\r\n\x1a\n".to_vec()),
            Err(PdfError::InvalidImage(_))
        ));
        assert!(JpegImage::parse(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_truncated_jpeg() {
        let mut bytes = sample_jpeg(8, 8);
        bytes.truncate(6);
        assert!(JpegImage::parse(bytes).is_err());
    }

    #[test]
    fn test_xobject_uses_dct() {
        let stream = JpegImage::parse(sample_jpeg(4, 4)).unwrap().to_xobject();
        assert!(stream.encoded);
        assert_eq!(stream.dict.get("Filter"), Some(&PdfObject::name("DCTDecode")));
        assert_eq!(stream.dict.get("Width"), Some(&PdfObject::Integer(4)));
    }
}
