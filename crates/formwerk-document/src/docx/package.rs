// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OPC packaging — the zip container, content types and relationship parts
// that wrap the WordprocessingML XML.

use std::io::{Cursor, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use formwerk_core::error::{FormwerkError, Result};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::xml::XmlBuilder;
use crate::image::LogoFormat;

pub(crate) const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_WP: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub(crate) const REL_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
pub(crate) const REL_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

/// A single relationship entry.
pub(crate) struct Relationship<'a> {
    pub id: &'a str,
    pub kind: &'a str,
    pub target: String,
}

/// Render a `.rels` part. An empty list still yields a valid part.
pub(crate) fn relationships_xml(rels: &[Relationship<'_>]) -> String {
    let mut xml = XmlBuilder::new();
    xml.open("Relationships", &[("xmlns", NS_PKG_RELS)]);
    for rel in rels {
        xml.empty(
            "Relationship",
            &[("Id", rel.id), ("Type", rel.kind), ("Target", rel.target.as_str())],
        );
    }
    xml.build()
}

/// `[Content_Types].xml` covering the fixed parts and any media formats used.
pub(crate) fn content_types_xml(media: &[LogoFormat]) -> String {
    let mut xml = XmlBuilder::new();
    xml.open("Types", &[("xmlns", NS_CONTENT_TYPES)])
        .empty(
            "Default",
            &[
                ("Extension", "rels"),
                ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
            ],
        )
        .empty(
            "Default",
            &[("Extension", "xml"), ("ContentType", "application/xml")],
        );

    let mut seen: Vec<LogoFormat> = Vec::new();
    for format in media {
        if !seen.contains(format) {
            seen.push(*format);
            xml.empty(
                "Default",
                &[
                    ("Extension", format.extension()),
                    ("ContentType", format.content_type()),
                ],
            );
        }
    }

    for (part, content_type) in [
        ("/word/document.xml", CT_MAIN),
        ("/word/styles.xml", CT_STYLES),
        ("/word/header1.xml", CT_HEADER),
        ("/word/footer1.xml", CT_FOOTER),
        ("/docProps/core.xml", CT_CORE),
    ] {
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        );
    }
    xml.build()
}

/// Package-level relationships pointing at the main document and metadata.
pub(crate) fn root_relationships_xml() -> String {
    relationships_xml(&[
        Relationship {
            id: "rId1",
            kind: REL_OFFICE_DOCUMENT,
            target: "word/document.xml".into(),
        },
        Relationship {
            id: "rId2",
            kind: REL_CORE_PROPERTIES,
            target: "docProps/core.xml".into(),
        },
    ])
}

/// Dublin Core metadata with creation and modification timestamps.
pub(crate) fn core_properties_xml(title: &str, created: DateTime<Utc>) -> String {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = XmlBuilder::new();
    xml.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )
    .open("dc:title", &[])
    .text(title)
    .close()
    .open("dc:creator", &[])
    .text("Formwerk")
    .close()
    .open("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")])
    .text(&stamp)
    .close()
    .open("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")])
    .text(&stamp)
    .close();
    xml.build()
}

/// Minimal style part: every paragraph carries direct formatting, so only
/// the `Normal` style has to exist.
pub(crate) fn styles_xml() -> String {
    let mut xml = XmlBuilder::new();
    xml.open("w:styles", &[("xmlns:w", NS_W)])
        .open(
            "w:style",
            &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
        )
        .empty("w:name", &[("w:val", "Normal")])
        .empty("w:qFormat", &[]);
    xml.build()
}

/// Accumulates parts and writes them into a deflated zip archive in memory.
pub(crate) struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl Package {
    pub(crate) fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
        }
    }

    /// Add one part at `name` (no leading slash).
    pub(crate) fn add(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| FormwerkError::Archive(format!("start {name}: {e}")))?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Finish the central directory and hand back the archive bytes.
    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| FormwerkError::Archive(format!("finish archive: {e}")))?;
        Ok(cursor.into_inner())
    }
}
