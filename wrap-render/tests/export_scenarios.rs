use proptest::prelude::*;
use wrap_core::{
    ArtworkSpec, BackgroundSpec, Design, ImageArt, ProjectRecord, TemplateError, TextArt,
    encode_rgba_to_png_bytes,
};
use wrap_render::{
    ExportFormat, FontLibrary, RenderConfig, RenderError, Renderer, encode_data_uri,
};

fn renderer() -> Renderer {
    let config = RenderConfig {
        system_fonts: false,
        cutout_dpi: 20.0,
        png_dpi: 20.0,
        pdf_dpi: 20.0,
        ..RenderConfig::default()
    };
    Renderer::with_fonts(config, FontLibrary::new("Roboto"))
}

fn checker_png() -> String {
    #[rustfmt::skip]
    let rgba = [
        255, 0, 0, 255,  0, 0, 255, 255,
        0, 0, 255, 255,  255, 0, 0, 255,
    ];
    encode_data_uri("image/png", &encode_rgba_to_png_bytes(2, 2, &rgba).unwrap())
}

fn project(background: BackgroundSpec, face: ArtworkSpec) -> ProjectRecord {
    ProjectRecord::new(
        "Scenario mug",
        Design {
            background,
            face,
            ..Design::default()
        },
    )
}

fn assert_binary_mask(png: &[u8]) {
    let img = image::load_from_memory(png).unwrap().to_rgba8();
    for px in img.pixels() {
        let [r, g, b, a] = px.0;
        assert!(
            a == 0 || (r, g, b, a) == (0, 0, 0, 255),
            "intermediate mask pixel {:?}",
            px.0
        );
    }
}

#[test]
fn exterior_only_cutout_is_one_black_path() {
    let r = renderer();
    let record = project(BackgroundSpec::default_color(), ArtworkSpec::Transparent);
    let (_, doc) = r.template(&record, true).unwrap();
    let artifact = r
        .export_cutout(&doc, &record.project_name, ExportFormat::Png, true)
        .unwrap();
    assert_eq!(artifact.file_name, "Scenariomug-exterior.svg");
    let svg = String::from_utf8(artifact.bytes).unwrap();
    assert_eq!(svg.matches("<path").count(), 1);
    assert_eq!(svg.matches(r#"fill="black""#).count(), 1);
    assert!(!svg.contains("<image"));
    assert!(svg.contains(r#"width="257.61mm""#));
}

#[test]
fn raster_cutout_mask_has_no_partial_alpha() {
    let r = renderer();
    let record = project(
        BackgroundSpec::Transparent,
        ArtworkSpec::Image(ImageArt {
            data_uri: checker_png(),
            ..ImageArt::default()
        }),
    );
    let (_, doc) = r.template(&record, false).unwrap();
    let artifact = r
        .export_cutout(&doc, &record.project_name, ExportFormat::Png, false)
        .unwrap();
    assert_eq!(artifact.file_name, "Scenariomug_cutout.png");
    assert_binary_mask(&artifact.bytes);
    let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!((img.width(), img.height()), (203, 75));
    assert!(img.pixels().any(|p| p.0[3] == 255));
    assert!(img.pixels().any(|p| p.0[3] == 0));
}

#[test]
fn svg_cutout_embeds_clipped_mask() {
    let r = renderer();
    let record = project(BackgroundSpec::default_color(), ArtworkSpec::Transparent);
    let (layout, doc) = r.template(&record, false).unwrap();
    let artifact = r
        .export_cutout(&doc, "", ExportFormat::Svg, false)
        .unwrap();
    assert_eq!(artifact.file_name, "mug-template_cutout.svg");
    let svg = String::from_utf8(artifact.bytes).unwrap();
    assert!(svg.contains("clipPath id=\"mugClipPath\""));
    assert!(svg.contains(&layout.cutout_path_data()));
    assert!(svg.contains("data:image/png;base64,"));
}

#[test]
fn design_exports_in_every_format() {
    let r = renderer();
    let record = project(BackgroundSpec::default_color(), ArtworkSpec::Transparent);
    let (_, doc) = r.template(&record, true).unwrap();

    let svg = r.export_design(&doc, &record.project_name, ExportFormat::Svg).unwrap();
    assert!(String::from_utf8(svg.bytes).unwrap().starts_with("<!--MUG_PAINTER_PROJECT_DATA:"));

    let png = r.export_design(&doc, &record.project_name, ExportFormat::Png).unwrap();
    let img = image::load_from_memory(&png.bytes).unwrap().to_rgba8();
    assert_eq!((img.width(), img.height()), (203, 75));
    // interior filled with the background colour
    assert_eq!(img.get_pixel(101, 37).0, [0xBF, 0xDB, 0xFE, 255]);

    let pdf = r.export_design(&doc, &record.project_name, ExportFormat::Pdf).unwrap();
    assert_eq!(pdf.file_name, "Scenariomug.pdf");
    assert!(pdf.bytes.starts_with(b"%PDF-"));
}

#[test]
fn text_without_fonts_fails_the_pass() {
    let r = renderer();
    let record = project(
        BackgroundSpec::Transparent,
        ArtworkSpec::Text(TextArt {
            text: "Hello".into(),
            ..TextArt::default()
        }),
    );
    let err = r.template(&record, false).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Template(TemplateError::Artwork { side: "face", .. })
    ));
}

#[test]
fn texture_follows_the_design() {
    let r = renderer();
    let record = project(BackgroundSpec::default_color(), ArtworkSpec::Transparent);
    let (_, doc) = r.template(&record, false).unwrap();
    let t = r.texture(&doc, 9, Some((128, 48))).unwrap();
    assert_eq!((t.width, t.height, t.generation), (128, 48, 9));
    assert_eq!(t.pixel(64, 24), Some([0xBF, 0xDB, 0xFE, 255]));
    let fallback = r.texture(&doc, 9, Some((0, 0))).unwrap();
    assert_eq!((fallback.width, fallback.height), (1024, 512));
}

#[test]
fn mesh_matches_project_dimensions() {
    let group = renderer().mesh(&Design::default().dimensions).unwrap();
    assert_eq!(group.meshes().len(), 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn any_background_colour_gives_binary_mask(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
        let renderer = renderer();
        let record = project(
            BackgroundSpec::Color { color: format!("#{r:02x}{g:02x}{b:02x}") },
            ArtworkSpec::Transparent,
        );
        let (_, doc) = renderer.template(&record, false).unwrap();
        let artifact = renderer
            .export_cutout(&doc, "", ExportFormat::Png, false)
            .unwrap();
        assert_binary_mask(&artifact.bytes);
    }
}
