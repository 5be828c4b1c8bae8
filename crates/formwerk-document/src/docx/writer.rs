// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — assemble styled blocks, page setup and branding into an
// OOXML word-processing package.
//
// Each styled block becomes one paragraph with a single run. All formatting
// is applied directly on the paragraph and run, so the output does not
// depend on the consumer's idea of document defaults.

use std::path::Path;

use chrono::Utc;
use formwerk_core::config::PageSetup;
use formwerk_core::error::Result;
use formwerk_core::{Alignment, BlockKind, Rgb, StyleDescriptor, StyledBlock};
use tracing::{debug, info, instrument};

use super::branding::Branding;
use super::package::{
    NS_A, NS_PIC, NS_R, NS_W, NS_WP, Package, REL_FOOTER, REL_HEADER, REL_IMAGE, REL_STYLES,
    Relationship, content_types_xml, core_properties_xml, relationships_xml,
    root_relationships_xml, styles_xml,
};
use super::xml::XmlBuilder;
use crate::image::{LogoFormat, LogoImage};

/// MIME type of the generated package.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// US Letter, in twentieths of a point.
const PAGE_WIDTH_TWIPS: i64 = 12_240;
const PAGE_HEIGHT_TWIPS: i64 = 15_840;

const TWIPS_PER_INCH: f32 = 1440.0;

/// `w:line` value for single spacing under `lineRule="auto"`.
const SINGLE_LINE: f32 = 240.0;

/// Space after the footer logo paragraph, in points.
const FOOTER_LOGO_SPACE_AFTER_PT: f32 = 1.0;

const REL_ID_STYLES: &str = "rIdStyles";
const REL_ID_HEADER: &str = "rIdHeader";
const REL_ID_FOOTER: &str = "rIdFooter";
const REL_ID_LOGO: &str = "rIdLogo";

const PART_NAMESPACES: [(&str, &str); 5] = [
    ("xmlns:w", NS_W),
    ("xmlns:r", NS_R),
    ("xmlns:wp", NS_WP),
    ("xmlns:a", NS_A),
    ("xmlns:pic", NS_PIC),
];

fn twips_from_pt(pt: f32) -> i64 {
    (pt * 20.0).round() as i64
}

fn twips_from_in(inches: f32) -> i64 {
    (inches * TWIPS_PER_INCH).round() as i64
}

fn half_points(pt: f32) -> i64 {
    (pt * 2.0).round() as i64
}

/// Builds DOCX packages from styled blocks.
#[derive(Debug, Clone)]
pub struct DocxWriter {
    /// Margins and header/footer distances.
    page: PageSetup,
    /// Title metadata; falls back to the first heading.
    title: Option<String>,
}

impl DocxWriter {
    pub fn new(page: PageSetup) -> Self {
        Self { page, title: None }
    }

    pub fn set_page(&mut self, page: PageSetup) {
        self.page = page;
    }

    /// Set a title for the package metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Assemble the complete package and return its bytes.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn build(&self, blocks: &[StyledBlock], branding: &Branding) -> Result<Vec<u8>> {
        let title = self.resolve_title(blocks);
        info!(
            title = %title,
            header_logo = branding.header_logo.is_some(),
            footer_logo = branding.footer_logo.is_some(),
            "Creating DOCX"
        );

        let media: Vec<LogoFormat> = [&branding.header_logo, &branding.footer_logo]
            .into_iter()
            .flatten()
            .map(LogoImage::format)
            .collect();

        let mut package = Package::new();
        package.add("[Content_Types].xml", content_types_xml(&media).as_bytes())?;
        package.add("_rels/.rels", root_relationships_xml().as_bytes())?;
        package.add(
            "docProps/core.xml",
            core_properties_xml(&title, Utc::now()).as_bytes(),
        )?;
        package.add("word/document.xml", self.document_xml(blocks).as_bytes())?;
        package.add("word/styles.xml", styles_xml().as_bytes())?;
        package.add(
            "word/_rels/document.xml.rels",
            document_relationships_xml().as_bytes(),
        )?;

        package.add("word/header1.xml", header_xml(branding).as_bytes())?;
        package.add("word/footer1.xml", footer_xml(branding).as_bytes())?;

        for (part, slot, logo) in [
            ("header1", "header", &branding.header_logo),
            ("footer1", "footer", &branding.footer_logo),
        ] {
            let mut rels = Vec::new();
            if let Some(logo) = logo {
                let file = format!("{slot}_logo.{}", logo.format().extension());
                package.add(&format!("word/media/{file}"), logo.bytes())?;
                rels.push(Relationship {
                    id: REL_ID_LOGO,
                    kind: REL_IMAGE,
                    target: format!("media/{file}"),
                });
            }
            package.add(
                &format!("word/_rels/{part}.xml.rels"),
                relationships_xml(&rels).as_bytes(),
            )?;
        }

        let bytes = package.finish()?;
        debug!(bytes = bytes.len(), "DOCX package complete");
        Ok(bytes)
    }

    /// Build the package and write it to a file.
    pub fn write_to_file(
        &self,
        blocks: &[StyledBlock],
        branding: &Branding,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.build(blocks, branding)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote DOCX to {}", path.as_ref().display());
        Ok(())
    }

    fn resolve_title(&self, blocks: &[StyledBlock]) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        blocks
            .iter()
            .find(|b| matches!(b.kind, BlockKind::Heading { .. }))
            .and_then(|b| b.text.lines().next())
            .unwrap_or("Formwerk Document")
            .to_string()
    }

    fn document_xml(&self, blocks: &[StyledBlock]) -> String {
        let mut xml = XmlBuilder::new();
        xml.open("w:document", &PART_NAMESPACES).open("w:body", &[]);

        for block in blocks {
            text_paragraph(&mut xml, &block.text, &block.descriptor);
        }

        let page = &self.page;
        xml.open("w:sectPr", &[])
            .empty(
                "w:headerReference",
                &[("w:type", "default"), ("r:id", REL_ID_HEADER)],
            )
            .empty(
                "w:footerReference",
                &[("w:type", "default"), ("r:id", REL_ID_FOOTER)],
            )
            .empty(
                "w:pgSz",
                &[
                    ("w:w", PAGE_WIDTH_TWIPS.to_string().as_str()),
                    ("w:h", PAGE_HEIGHT_TWIPS.to_string().as_str()),
                ],
            )
            .empty(
                "w:pgMar",
                &[
                    ("w:top", twips_from_in(page.top_in).to_string().as_str()),
                    ("w:right", twips_from_in(page.right_in).to_string().as_str()),
                    ("w:bottom", twips_from_in(page.bottom_in).to_string().as_str()),
                    ("w:left", twips_from_in(page.left_in).to_string().as_str()),
                    (
                        "w:header",
                        twips_from_in(page.header_distance_in).to_string().as_str(),
                    ),
                    (
                        "w:footer",
                        twips_from_in(page.footer_distance_in).to_string().as_str(),
                    ),
                    ("w:gutter", "0"),
                ],
            )
            .close();

        xml.build()
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new(PageSetup::default())
    }
}

// -- Part builders ------------------------------------------------------------

fn document_relationships_xml() -> String {
    relationships_xml(&[
        Relationship {
            id: REL_ID_STYLES,
            kind: REL_STYLES,
            target: "styles.xml".into(),
        },
        Relationship {
            id: REL_ID_HEADER,
            kind: REL_HEADER,
            target: "header1.xml".into(),
        },
        Relationship {
            id: REL_ID_FOOTER,
            kind: REL_FOOTER,
            target: "footer1.xml".into(),
        },
    ])
}

fn header_xml(branding: &Branding) -> String {
    let mut xml = XmlBuilder::new();
    xml.open("w:hdr", &PART_NAMESPACES);

    paragraph_properties(&mut xml, Alignment::Left, 0.0, 0.0, None);
    if let Some(logo) = &branding.header_logo {
        drawing_run(&mut xml, logo, branding.header_logo_height_in, 1, "Header logo");
    }
    xml.close();

    xml.build()
}

fn footer_xml(branding: &Branding) -> String {
    let mut xml = XmlBuilder::new();
    xml.open("w:ftr", &PART_NAMESPACES);

    paragraph_properties(
        &mut xml,
        Alignment::Left,
        0.0,
        FOOTER_LOGO_SPACE_AFTER_PT,
        None,
    );
    if let Some(logo) = &branding.footer_logo {
        drawing_run(&mut xml, logo, branding.footer_logo_height_in, 2, "Footer logo");
    }
    xml.close();

    for line in &branding.footer_lines {
        paragraph_properties(&mut xml, Alignment::Center, 0.0, 0.0, None);
        text_run(
            &mut xml,
            line,
            &branding.footer_font,
            branding.footer_font_size_pt,
            false,
            branding.footer_color,
        );
        xml.close();
    }

    xml.build()
}

// -- Paragraph and run helpers -----------------------------------------------

/// Open a `w:p` and write its properties. The paragraph stays open.
fn paragraph_properties(
    xml: &mut XmlBuilder,
    alignment: Alignment,
    before_pt: f32,
    after_pt: f32,
    line_spacing: Option<f32>,
) {
    let before = twips_from_pt(before_pt).to_string();
    let after = twips_from_pt(after_pt).to_string();
    let mut spacing: Vec<(&str, &str)> =
        vec![("w:before", before.as_str()), ("w:after", after.as_str())];
    let line = line_spacing.map(|m| ((m * SINGLE_LINE).round() as i64).to_string());
    if let Some(line) = &line {
        spacing.push(("w:line", line.as_str()));
        spacing.push(("w:lineRule", "auto"));
    }

    xml.open("w:p", &[])
        .open("w:pPr", &[])
        .empty("w:spacing", &spacing)
        .empty("w:jc", &[("w:val", alignment.ooxml_value())])
        .close();
}

/// One paragraph carrying a styled block.
fn text_paragraph(xml: &mut XmlBuilder, text: &str, d: &StyleDescriptor) {
    paragraph_properties(
        xml,
        d.alignment,
        d.space_before_pt,
        d.space_after_pt,
        Some(d.line_spacing),
    );
    text_run(xml, text, &d.font_family, d.size_pt, d.bold, d.color);
    xml.close();
}

/// A run with full character formatting; embedded line feeds become `w:br`.
fn text_run(xml: &mut XmlBuilder, text: &str, font: &str, size_pt: f32, bold: bool, color: Rgb) {
    let size = half_points(size_pt).to_string();
    let color = color.hex();

    xml.open("w:r", &[])
        .open("w:rPr", &[])
        .empty(
            "w:rFonts",
            &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)],
        );
    if bold {
        xml.empty("w:b", &[]).empty("w:bCs", &[]);
    }
    xml.empty("w:color", &[("w:val", color.as_str())])
        .empty("w:sz", &[("w:val", size.as_str())])
        .empty("w:szCs", &[("w:val", size.as_str())])
        .close();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.empty("w:br", &[]);
        }
        xml.open("w:t", &[("xml:space", "preserve")])
            .text(line)
            .close();
    }
    xml.close();
}

/// An inline picture run referencing the part's logo relationship.
fn drawing_run(xml: &mut XmlBuilder, logo: &LogoImage, height_in: f32, id: u32, name: &str) {
    let (cx, cy) = logo.extent_emu(height_in);
    let (cx, cy) = (cx.to_string(), cy.to_string());
    let id = id.to_string();
    let file = format!("{name}.{}", logo.format().extension());

    xml.open("w:r", &[])
        .open("w:drawing", &[])
        .open(
            "wp:inline",
            &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
        )
        .empty("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])
        .empty("wp:docPr", &[("id", id.as_str()), ("name", name)])
        .open("a:graphic", &[])
        .open("a:graphicData", &[("uri", NS_PIC)])
        .open("pic:pic", &[])
        .open("pic:nvPicPr", &[])
        .empty("pic:cNvPr", &[("id", id.as_str()), ("name", file.as_str())])
        .empty("pic:cNvPicPr", &[])
        .close()
        .open("pic:blipFill", &[])
        .empty("a:blip", &[("r:embed", REL_ID_LOGO)])
        .open("a:stretch", &[])
        .empty("a:fillRect", &[])
        .close()
        .close()
        .open("pic:spPr", &[])
        .open("a:xfrm", &[])
        .empty("a:off", &[("x", "0"), ("y", "0")])
        .empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])
        .close()
        .open("a:prstGeom", &[("prst", "rect")])
        .empty("a:avLst", &[])
        .close()
        .close() // pic:spPr
        .close() // pic:pic
        .close() // a:graphicData
        .close() // a:graphic
        .close() // wp:inline
        .close() // w:drawing
        .close(); // w:r
}
