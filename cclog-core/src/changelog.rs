//! XML change log persistence.
//!
//! ```xml
//! <changelog>
//!   <entry>
//!     <date>2013-06-01 12:30:00</date>
//!     <user>fubar</user>
//!     <operation>checkin</operation>
//!     <eventdescription>create version</eventdescription>
//!     <version>/main/3</version>
//!     <comment>improved build performance</comment>
//!     <items>
//!       <item>/vobs/source/apps/java/project/build.gradle</item>
//!     </items>
//!   </entry>
//! </changelog>
//! ```

use crate::error::{Error, Result};
use crate::models::ChangeEntry;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use quick_xml::events::Event;
use quick_xml::se::Serializer;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, error};

const CHANGELOG: &str = "changelog";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Dates are stored in UTC with second precision.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChangeLogDocument {
    #[serde(rename = "entry", default)]
    entries: Vec<EntryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    date: String,
    user: String,
    operation: String,
    eventdescription: String,
    version: String,
    comment: String,
    #[serde(default)]
    items: ItemsRecord,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ItemsRecord {
    #[serde(rename = "item", default)]
    paths: Vec<String>,
}

impl From<&ChangeEntry> for EntryRecord {
    fn from(entry: &ChangeEntry) -> Self {
        Self {
            date: entry.date().map(format_date).unwrap_or_default(),
            user: entry.user().to_string(),
            operation: entry.operation().to_string(),
            eventdescription: entry.event_description().to_string(),
            version: entry.version().to_string(),
            comment: entry.comment().to_string(),
            items: ItemsRecord {
                paths: entry.affected_paths().to_vec(),
            },
        }
    }
}

impl TryFrom<EntryRecord> for ChangeEntry {
    type Error = Error;

    fn try_from(record: EntryRecord) -> Result<Self> {
        let date = match record.date.trim() {
            "" => None,
            text => Some(parse_date(text)?),
        };

        let mut entry = ChangeEntry::new(date, record.user.trim())
            .with_operation(record.operation.trim())
            .with_event_description(record.eventdescription.trim())
            .with_version(record.version.trim())
            .with_comment(record.comment.trim());

        for path in record.items.paths {
            entry.add_path(path.trim());
        }

        Ok(entry)
    }
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(text: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| Error::InvalidDate(format!("{:?}: {}", text, e)))
}

/// Reads and writes change entry lists as XML documents.
#[derive(Debug, Clone, Copy)]
pub struct ChangeLogCodec {
    indent: usize,
}

impl Default for ChangeLogCodec {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl ChangeLogCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spaces per nesting level in written documents. Zero writes everything
    /// on one line.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn to_xml_string(&self, entries: &[ChangeEntry]) -> Result<String> {
        let document = ChangeLogDocument {
            entries: entries.iter().map(EntryRecord::from).collect(),
        };

        let mut body = String::new();
        let mut ser = Serializer::with_root(&mut body, Some(CHANGELOG))
            .map_err(|e| Error::WriteFailed(e.to_string()))?;
        if self.indent > 0 {
            ser.indent(' ', self.indent);
        }
        document
            .serialize(ser)
            .map_err(|e| Error::WriteFailed(e.to_string()))?;

        Ok(format!("{}\n{}\n", XML_DECLARATION, body))
    }

    pub fn write<W: Write>(&self, writer: W, entries: &[ChangeEntry]) -> Result<()> {
        let xml = self.to_xml_string(entries)?;
        let mut writer = BufWriter::new(writer);
        writer.write_all(xml.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Writes `entries` to `path`, replacing any existing file.
    pub fn try_write_file<P: AsRef<Path>>(&self, path: P, entries: &[ChangeEntry]) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write(file, entries)?;
        debug!(
            "Wrote {} change log entries to {:?}",
            entries.len(),
            path.as_ref()
        );
        Ok(())
    }

    /// Like [`ChangeLogCodec::try_write_file`], but only reports success.
    /// The cause of a failure is logged.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, entries: &[ChangeEntry]) -> bool {
        match self.try_write_file(path.as_ref(), entries) {
            Ok(()) => true,
            Err(e) => {
                error!("Couldn't write change log to {:?}: {}", path.as_ref(), e);
                false
            }
        }
    }

    pub fn from_xml_str(&self, xml: &str) -> Result<Vec<ChangeEntry>> {
        ensure_root(xml)?;

        let document: ChangeLogDocument = quick_xml::de::from_str(xml)?;
        document
            .entries
            .into_iter()
            .map(ChangeEntry::try_from)
            .collect()
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<ChangeEntry>> {
        let mut xml = String::new();
        BufReader::new(reader).read_to_string(&mut xml)?;
        self.from_xml_str(&xml)
    }

    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ChangeEntry>> {
        let file = File::open(path.as_ref())?;
        let entries = self.read(file)?;
        debug!(
            "Read {} change log entries from {:?}",
            entries.len(),
            path.as_ref()
        );
        Ok(entries)
    }
}

/// The document element has to be `<changelog>`.
fn ensure_root(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return if e.name().as_ref() == CHANGELOG.as_bytes() {
                    Ok(())
                } else {
                    Err(Error::MissingElement(CHANGELOG.to_string()))
                };
            }
            Event::Eof => return Err(Error::MissingElement(CHANGELOG.to_string())),
            _ => {}
        }
    }
}
