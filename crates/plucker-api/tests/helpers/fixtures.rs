use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};
use img_parts::png::{Png, PngChunk};
use std::io::Cursor;

/// Small valid PNG without text chunks.
pub fn plain_png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(8, 8, Rgba([200, 30, 30, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// PNG carrying `tEXt` entries, inserted before `IEND`.
pub fn png_with_text(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut png = Png::from_bytes(Bytes::from(plain_png())).unwrap();
    let at = png.chunks().len() - 1;
    for (offset, (key, value)) in entries.iter().enumerate() {
        let mut contents = key.as_bytes().to_vec();
        contents.push(0);
        contents.extend_from_slice(value.as_bytes());
        png.chunks_mut()
            .insert(at + offset, PngChunk::new(*b"tEXt", Bytes::from(contents)));
    }
    png.encoder().bytes().to_vec()
}

/// Prompt graph with one sampler wired to a text encoder.
pub fn prompt_graph(positive: &str) -> String {
    serde_json::json!({
        "3": {"class_type": "KSampler", "inputs": {"positive": ["6", 0], "negative": ["7", 0]}},
        "6": {"class_type": "CLIPTextEncode", "inputs": {"text": positive}},
        "7": {"class_type": "CLIPTextEncode", "_meta": {"title": "Negative"}, "inputs": {"text": "blurry, low quality"}}
    })
    .to_string()
}
