//! Single-page PDF wrapping a raster export.

use super::ExportResult;
use super::raster::RasterImage;
use kurbo::Size;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Name of the page image in the page resources.
const IMAGE_NAME: &str = "Im0";

/// Wrap `image` in a one-page document. The page measures `page_size`
/// points, the canvas size, whatever the raster resolution.
pub fn render_pdf(image: &RasterImage, page_size: Size) -> ExportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let (rgb, alpha) = image.split_alpha();

    let mut smask = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    );
    compress(&mut smask);
    let smask_id = doc.add_object(smask);

    let mut picture = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
        },
        rgb,
    );
    compress(&mut picture);
    let image_id = doc.add_object(picture);

    let (width, height) = (page_size.width as f32, page_size.height as f32);
    // Image space is the unit square; scale it to cover the page.
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.0_f32.into(),
                    0.0_f32.into(),
                    height.into(),
                    0.0_f32.into(),
                    0.0_f32.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.into())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.0_f32.into(), 0.0_f32.into(), width.into(), height.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    log::debug!(
        "Wrote {}x{} pt PDF page with a {}x{} image",
        width,
        height,
        image.width,
        image.height
    );
    Ok(bytes)
}

fn compress(stream: &mut Stream) {
    if let Err(e) = stream.compress() {
        log::debug!("Leaving image stream uncompressed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(object: &Object) -> f64 {
        match object {
            Object::Integer(i) => *i as f64,
            Object::Real(f) => *f as f64,
            other => panic!("not a number: {other:?}"),
        }
    }

    #[test]
    fn test_page_sized_to_canvas() {
        let image = RasterImage {
            width: 6,
            height: 3,
            pixels: vec![128; 6 * 3 * 4],
        };
        let bytes = render_pdf(&image, Size::new(2.0, 1.0)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box: Vec<f64> = page
            .get(b"MediaBox")
            .and_then(Object::as_array)
            .unwrap()
            .iter()
            .map(number)
            .collect();
        assert_eq!(media_box, vec![0.0, 0.0, 2.0, 1.0]);

        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let operators: Vec<&str> = content.operations.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, vec!["q", "cm", "Do", "Q"]);
    }
}
