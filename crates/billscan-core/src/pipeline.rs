//! Batch orchestration: OCR, field parsing, and result collection.

use futures_util::stream::{self, StreamExt};
use tracing::info;

use crate::error::{BillscanError, ExtractionError, OcrError};
use crate::invoice::{InvoiceField, InvoiceParser, KeywordInvoiceParser};
use crate::models::invoice::{InvoiceRecord, ParsedFields};
use crate::ocr::{ImageInput, OcrBackend};
use crate::sink::CsvSink;

/// What happened to one uploaded image.
#[derive(Debug)]
pub struct ImageOutcome {
    /// Position of the image in the upload order.
    pub index: usize,

    /// File name of the image.
    pub name: String,

    /// OCR failure, if the service call failed. The image was parsed as empty text.
    pub ocr_error: Option<OcrError>,

    /// Fields found in the recognized text.
    pub fields: ParsedFields,
}

impl ImageOutcome {
    /// The complete record, if all three fields were found.
    pub fn record(&self) -> Option<InvoiceRecord> {
        self.fields.clone().into_record().ok()
    }

    /// Whether the image produced a complete record.
    pub fn is_complete(&self) -> bool {
        self.fields.is_complete()
    }

    /// Fields that were not found.
    pub fn missing(&self) -> Vec<InvoiceField> {
        self.fields.missing()
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per image, in upload order.
    pub outcomes: Vec<ImageOutcome>,

    /// Complete records, in upload order.
    pub records: Vec<InvoiceRecord>,
}

impl BatchReport {
    /// Images that did not produce a record.
    pub fn failed(&self) -> impl Iterator<Item = &ImageOutcome> {
        self.outcomes.iter().filter(|o| !o.is_complete())
    }

    /// Write the records to `sink`.
    ///
    /// An empty result set is an error and leaves any existing file untouched.
    pub fn save(&self, sink: &CsvSink) -> Result<(), BillscanError> {
        if self.records.is_empty() {
            return Err(ExtractionError::NoData.into());
        }

        sink.write(&self.records)?;
        info!(
            "Saved {} of {} images to {}",
            self.records.len(),
            self.outcomes.len(),
            sink.path().display()
        );
        Ok(())
    }
}

/// Runs OCR and field parsing over a batch of images.
pub struct Pipeline<B: OcrBackend, P: InvoiceParser = KeywordInvoiceParser> {
    backend: B,
    parser: P,
    jobs: usize,
}

impl<B: OcrBackend> Pipeline<B> {
    /// Create a sequential pipeline with the keyword parser.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            parser: KeywordInvoiceParser::new(),
            jobs: 1,
        }
    }
}

impl<B: OcrBackend, P: InvoiceParser> Pipeline<B, P> {
    /// Use a different parser.
    pub fn with_parser<Q: InvoiceParser>(self, parser: Q) -> Pipeline<B, Q> {
        Pipeline {
            backend: self.backend,
            parser,
            jobs: self.jobs,
        }
    }

    /// Set how many images may be at the OCR service at once. Zero means one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// The OCR backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Extract and parse a single image.
    ///
    /// OCR failures are logged and recorded; the image is then parsed as empty text.
    pub async fn process_image(&self, index: usize, image: &ImageInput) -> ImageOutcome {
        let (text, ocr_error) = match self.backend.extract_text(image).await {
            Ok(text) => (text, None),
            Err(e) => {
                info!("OCR failed for {}: {}", image.name, e);
                (String::new(), Some(e))
            }
        };

        let fields = self.parser.parse(&text);
        if !fields.is_complete() {
            info!(
                "Failed to extract all required data from {}: missing {:?}",
                image.name,
                fields.missing()
            );
        }

        ImageOutcome {
            index,
            name: image.name.clone(),
            ocr_error,
            fields,
        }
    }

    /// Process all images and collect complete records in upload order.
    ///
    /// `on_outcome` sees every outcome in upload order as soon as it and all
    /// earlier images are done.
    pub async fn run<F>(&self, images: Vec<ImageInput>, mut on_outcome: F) -> BatchReport
    where
        F: FnMut(&ImageOutcome),
    {
        let total = images.len();
        info!("Processing {} images with {} job(s)", total, self.jobs);

        let mut outcomes = stream::iter(images.into_iter().enumerate())
            .map(move |(index, image)| async move { self.process_image(index, &image).await })
            .buffered(self.jobs);

        let mut report = BatchReport::default();
        while let Some(outcome) = outcomes.next().await {
            on_outcome(&outcome);
            if let Some(record) = outcome.record() {
                report.records.push(record);
            }
            report.outcomes.push(outcome);
        }

        info!("{} of {} images produced a complete record", report.records.len(), total);
        report
    }
}
