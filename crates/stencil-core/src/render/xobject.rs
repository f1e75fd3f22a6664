//! Image XObject creation
//!
//! JPEG data is embedded as-is with the DCTDecode filter; PDF readers
//! decode it directly, so no re-encoding happens here.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Add a baseline RGB JPEG to `output` as an image XObject.
///
/// # Arguments
/// * `output` - The document to add the XObject to
/// * `jpeg` - Encoded JPEG bytes
/// * `width` - Pixel width of the JPEG
/// * `height` - Pixel height of the JPEG
pub fn create_jpeg_xobject(output: &mut Document, jpeg: Vec<u8>, width: u32, height: u32) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    let mut stream = Stream::new(dict, jpeg);
    // Already compressed
    stream.allows_compression = false;

    output.add_object(stream)
}
