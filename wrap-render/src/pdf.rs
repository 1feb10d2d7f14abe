use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};

use crate::raster::Raster;

/// US Letter, landscape.
pub const PAGE_WIDTH_MM: f64 = 279.4;
pub const PAGE_HEIGHT_MM: f64 = 215.9;
pub const PAGE_MARGIN_MM: f64 = 6.3;

const PT_PER_MM: f64 = 72.0 / 25.4;

/// Where content lands on the page, in millimeters from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scales content uniformly to fit inside the margins, anchored at the
/// top-left margin corner.
pub fn fit_to_page(width_mm: f64, height_mm: f64) -> Placement {
    let max_w = PAGE_WIDTH_MM - 2.0 * PAGE_MARGIN_MM;
    let max_h = PAGE_HEIGHT_MM - 2.0 * PAGE_MARGIN_MM;
    let scale = (max_w / width_mm).min(max_h / height_mm);
    Placement {
        x: PAGE_MARGIN_MM,
        y: PAGE_MARGIN_MM,
        width: width_mm * scale,
        height: height_mm * scale,
    }
}

/// Single-page PDF showing `raster` at the fitted placement for content of
/// `width_mm` x `height_mm`. Alpha goes into a soft mask.
pub fn raster_pdf(raster: &Raster, width_mm: f64, height_mm: f64) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let mask_id = Ref::new(5);
    let content_id = Ref::new(6);
    let image_name = Name(b"Im1");

    let mut rgb = Vec::with_capacity(raster.rgba.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(raster.rgba.len() / 4);
    for px in raster.pixels() {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
    }
    let has_alpha = alpha.iter().any(|&a| a < 255);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let page_w = (PAGE_WIDTH_MM * PT_PER_MM) as f32;
    let page_h = (PAGE_HEIGHT_MM * PT_PER_MM) as f32;
    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, page_w, page_h));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(image_name, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, &rgb);
    image.width(raster.width as i32);
    image.height(raster.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    if has_alpha {
        image.s_mask(mask_id);
    }
    image.finish();

    if has_alpha {
        let mut mask = pdf.image_xobject(mask_id, &alpha);
        mask.width(raster.width as i32);
        mask.height(raster.height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask.finish();
    }

    // PDF space has its origin at the bottom-left.
    let place = fit_to_page(width_mm, height_mm);
    let w = (place.width * PT_PER_MM) as f32;
    let h = (place.height * PT_PER_MM) as f32;
    let x = (place.x * PT_PER_MM) as f32;
    let y = page_h - ((place.y + place.height) * PT_PER_MM) as f32;
    let mut content = Content::new();
    content.save_state();
    content.transform([w, 0.0, 0.0, h, x, y]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    log::debug!(
        "pdf page with {}x{} px image at {:.1}x{:.1} mm",
        raster.width,
        raster.height,
        place.width,
        place.height
    );
    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wide_sheet_is_width_limited() {
        let p = fit_to_page(257.61, 95.0);
        assert_relative_eq!(p.width, 266.8, epsilon = 1e-9);
        assert_relative_eq!(p.height, 95.0 * 266.8 / 257.61, epsilon = 1e-9);
        let p = fit_to_page(400.0, 100.0);
        assert_relative_eq!(p.width, 266.8, epsilon = 1e-9);
        assert_relative_eq!(p.height, 66.7, epsilon = 1e-9);
        assert_eq!((p.x, p.y), (PAGE_MARGIN_MM, PAGE_MARGIN_MM));
    }

    #[test]
    fn tall_content_is_height_limited() {
        let p = fit_to_page(100.0, 406.6);
        assert_relative_eq!(p.height, 203.3, epsilon = 1e-9);
        assert_relative_eq!(p.width, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn writes_a_pdf_with_soft_mask_when_needed() {
        let raster = Raster {
            width: 2,
            height: 1,
            rgba: vec![0, 0, 0, 255, 0, 0, 0, 0],
        };
        let bytes = raster_pdf(&raster, 100.0, 50.0);
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/SMask"));
        assert!(text.contains("/Im1"));

        let opaque = Raster {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 255],
        };
        let text = String::from_utf8_lossy(&raster_pdf(&opaque, 10.0, 10.0)).into_owned();
        assert!(!text.contains("/SMask"));
    }
}
