//! Convenience wrapper around one log source

use std::path::Path;

use crate::config::Config;
use crate::decode::{
    decode_header, open_region, probe_footer, DataRegion, PrimaryRecords, SecondaryRecords,
    SourceStream,
};
use crate::format::{FileFooter, FileHeader, FooterProbe};
use crate::source::{ByteSource, FileSource, MappedFile};
use crate::validate::{ValidationReport, Validator};
use crate::{LogError, Result};

/// A log with its header decoded and footer probed once
///
/// Every record accessor starts a new, independent pass.
///
/// ```no_run
/// # fn main() -> lclog::Result<()> {
/// let log = lclog::LogFile::open("log_001.bin")?;
/// for record in log.primaries()? {
///     let record = record?;
///     println!("{:.6}: {}", record.timestamp_secs(), record.raw_value);
/// }
/// # Ok(())
/// # }
/// ```
pub struct LogFile<S> {
    source: S,
    header: FileHeader,
    probe: FooterProbe,
    region: DataRegion,
}

impl LogFile<FileSource> {
    /// Open a log file, reading it through a fresh handle per pass
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, unreadable or has a truncated
    /// header
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LogError::FileNotFound(path.display().to_string()));
        }
        Self::new(FileSource::new(path))
    }
}

impl LogFile<MappedFile> {
    /// Open a log file through a read-only memory map
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, cannot be mapped or has a
    /// truncated header
    pub fn open_mapped(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LogError::FileNotFound(path.display().to_string()));
        }
        Self::new(MappedFile::open(path)?)
    }
}

impl<S: ByteSource> LogFile<S> {
    /// Wrap a source, decoding its header and probing for a footer
    ///
    /// # Errors
    ///
    /// Returns error if the header is truncated or the source unreadable
    pub fn new(source: S) -> Result<Self> {
        let header = decode_header(&source)?;
        let probe = probe_footer(&source)?;
        let region = DataRegion::new(source.byte_len()?, &probe);
        Ok(Self {
            source,
            header,
            probe,
            region,
        })
    }

    /// Decoded header
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Footer, if the file ended cleanly
    #[must_use]
    pub fn footer(&self) -> Option<&FileFooter> {
        self.probe.footer()
    }

    /// Detailed outcome of the footer probe
    #[must_use]
    pub fn footer_probe(&self) -> &FooterProbe {
        &self.probe
    }

    /// Bytes holding records
    #[must_use]
    pub fn data_region(&self) -> DataRegion {
        self.region
    }

    /// Underlying source
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether the header is structurally valid
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.header.is_valid()
    }

    /// Whether the file ended with a valid footer
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.probe.is_present()
    }

    /// New pass over all records in file order
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be opened
    pub fn records(&self) -> Result<SourceStream<'_, S>> {
        open_region(&self.source, &self.header, self.region)
    }

    /// New pass over primary records
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be opened
    pub fn primaries(&self) -> Result<PrimaryRecords<std::io::Take<S::Cursor<'_>>>> {
        Ok(self.records()?.into_primaries())
    }

    /// New pass over secondary records
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be opened
    pub fn secondaries(&self) -> Result<SecondaryRecords<std::io::Take<S::Cursor<'_>>>> {
        Ok(self.records()?.into_secondaries())
    }

    /// Primary record count: the footer's total, or counted by a pass
    ///
    /// # Errors
    ///
    /// Returns error if a counting pass fails
    pub fn primary_count(&self) -> Result<u64> {
        match self.footer() {
            Some(footer) => Ok(footer.total_primary),
            None => Ok(self.count_pass()?.0),
        }
    }

    /// Secondary record count: the footer's total, or counted by a pass
    ///
    /// # Errors
    ///
    /// Returns error if a counting pass fails
    pub fn secondary_count(&self) -> Result<u64> {
        match self.footer() {
            Some(footer) => Ok(footer.total_secondary),
            None => Ok(self.count_pass()?.1),
        }
    }

    /// Capture duration: the footer's end timestamp, or the last primary
    ///
    /// # Errors
    ///
    /// Returns error if the fallback pass fails
    pub fn duration_secs(&self) -> Result<f64> {
        if let Some(footer) = self.footer() {
            return Ok(footer.duration_secs());
        }

        let mut last = None;
        for record in self.primaries()? {
            last = Some(record?);
        }
        Ok(last.map_or(0.0, |r| r.timestamp_secs()))
    }

    /// Samples the producer reported dropping, 0 without a footer
    #[must_use]
    pub fn dropped_count(&self) -> u32 {
        self.footer().map_or(0, |f| f.dropped)
    }

    /// Run a full validation
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be read
    pub fn validate(&self, config: &Config) -> Result<ValidationReport> {
        Validator::new(config.clone()).run(&self.source)
    }

    fn count_pass(&self) -> Result<(u64, u64)> {
        let mut stream = self.records()?;
        for record in stream.by_ref() {
            record?;
        }
        Ok((stream.primaries_read(), stream.secondaries_read()))
    }
}
