//! Annotation session: the controller for one group's view.
//!
//! A session owns the filtered reference sequence, the group's annotation
//! store and the navigation state. Every edit goes through the session so
//! that it is applied to the current reference and persisted immediately.
//! Presentation code reads [`ReferenceView`] and [`ListItem`] values and
//! never touches the store directly.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Catalog, Reference, Year};
use crate::error::{RefclassError, Result, StorageError};
use crate::export::{export_filename, parse_upload, to_pretty_json, ExportEntry, SubmitPayload};
use crate::navigation::{initial_index, Navigator};
use crate::record::ClassificationRecord;
use crate::storage::Storage;
use crate::store::AnnotationStore;
use crate::vocabulary::ClassificationField;

/// Directory PDFs are served from, relative to the UI root.
pub const PDF_PATH: &str = "pdfs/";

/// Viewer URL for a PDF filename.
pub fn pdf_url(pdf: &str) -> String {
    format!("{}{}#view=FitH&navpanes=0", PDF_PATH, pdf)
}

/// Detail view of the current reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceView {
    pub id: u64,
    /// 1-based position in the filtered sequence
    pub position: usize,
    pub total: usize,
    pub year: Year,
    pub author: String,
    pub authors: String,
    pub title: String,
    pub doi: String,
    pub pdf_url: String,
    /// `#012 • 1994 • Duhaime AC • "Title" (3 of 40)`
    pub info: String,
    pub article_type: Option<String>,
    pub topic: Option<String>,
    pub motivation: String,
}

impl ReferenceView {
    fn new(
        reference: &Reference,
        record: Option<&ClassificationRecord>,
        index: usize,
        total: usize,
    ) -> Self {
        let record = record.cloned().unwrap_or_default();
        let position = index + 1;
        Self {
            id: reference.id,
            position,
            total,
            year: reference.year.clone(),
            author: reference.author().to_string(),
            authors: reference.authors.clone(),
            title: reference.title.clone(),
            doi: reference.doi_or_empty().to_string(),
            pdf_url: pdf_url(reference.pdf.as_deref().unwrap_or("")),
            info: format!(
                "#{:03} • {} • {} • \"{}\" ({} of {})",
                reference.id,
                reference.year,
                reference.author(),
                reference.title,
                position,
                total
            ),
            motivation: record.motivation_or_empty().to_string(),
            article_type: record.article_type,
            topic: record.topic,
        }
    }
}

/// One row of the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub index: usize,
    pub id: u64,
    /// `#12 - 1994 - Duhaime AC - Title`
    pub label: String,
    pub active: bool,
    pub classified: bool,
}

/// A download: filename plus pretty-printed JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

/// Application state for one group identifier.
#[derive(Debug)]
pub struct AnnotationSession {
    group: Option<String>,
    references: Vec<Reference>,
    store: AnnotationStore,
    nav: Navigator,
}

impl AnnotationSession {
    /// Open a group's view: filter, restore its partition, pick the start.
    pub fn open(
        catalog: &Catalog,
        storage: Arc<dyn Storage>,
        group: Option<&str>,
    ) -> std::result::Result<Self, StorageError> {
        let references = catalog.for_group(group);
        let store = AnnotationStore::restore(storage, group)?;
        let start = initial_index(&references, &store);
        tracing::info!(
            "Opened session {} with {} references, starting at {}",
            store.key(),
            references.len(),
            start
        );
        Ok(Self {
            group: group.map(str::to_string),
            nav: Navigator::new(references.len(), start),
            references,
            store,
        })
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn current_index(&self) -> Option<usize> {
        self.nav.current()
    }

    pub fn current_reference(&self) -> Option<&Reference> {
        self.nav.current().and_then(|i| self.references.get(i))
    }

    /// Detail view of the current reference.
    pub fn current(&self) -> Option<ReferenceView> {
        let index = self.nav.current()?;
        let reference = self.references.get(index)?;
        Some(ReferenceView::new(
            reference,
            self.store.get(&reference.key()),
            index,
            self.references.len(),
        ))
    }

    /// All list rows, with the current one marked active.
    pub fn list(&self) -> Vec<ListItem> {
        let current = self.nav.current();
        self.references
            .iter()
            .enumerate()
            .map(|(index, r)| ListItem {
                index,
                id: r.id,
                label: format!("#{} - {} - {} - {}", r.id, r.year, r.author(), r.title),
                active: current == Some(index),
                classified: !crate::record::is_unclassified(self.store.get(&r.key())),
            })
            .collect()
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        self.nav.go_to(index)
    }

    pub fn prev(&mut self) -> bool {
        self.nav.prev()
    }

    pub fn next(&mut self) -> bool {
        self.nav.next()
    }

    fn current_key(&self) -> Result<String> {
        self.current_reference()
            .map(Reference::key)
            .ok_or(RefclassError::NoSelection)
    }

    /// Toggle an option on the current reference and persist.
    ///
    /// Returns the field's new value (`None` when the click deselected it).
    pub fn select_option(
        &mut self,
        field: ClassificationField,
        value: &str,
    ) -> Result<Option<String>> {
        if !field.accepts(value) {
            return Err(RefclassError::InvalidOption {
                field: field.key().to_string(),
                value: value.to_string(),
            });
        }
        let key = self.current_key()?;
        let selected = self.store.update(&key, |store| store.set_field(&key, field, value))?;
        tracing::debug!("Reference {} {} -> {:?}", key, field.key(), selected);
        Ok(selected)
    }

    /// Overwrite the current reference's motivation and persist.
    pub fn set_motivation(&mut self, text: &str) -> Result<()> {
        let key = self.current_key()?;
        self.store.update(&key, |store| store.set_motivation(&key, text))?;
        Ok(())
    }

    /// Classified records of this view, with this session's group tag.
    pub fn export_entries(&self) -> Vec<ExportEntry> {
        self.store.export_snapshot(&self.references, self.group.as_deref())
    }

    /// The downloadable export file.
    pub fn export_file(&self) -> Result<ExportFile> {
        let contents = to_pretty_json(&self.export_entries())
            .map_err(|e| RefclassError::Serialization(e.to_string()))?;
        Ok(ExportFile {
            filename: export_filename(self.group.as_deref()),
            contents,
        })
    }

    /// Body for a remote submission.
    pub fn submission_payload(&self) -> SubmitPayload {
        SubmitPayload::new(self.group.as_deref(), self.export_entries())
    }

    /// Merge an uploaded export file into the store.
    ///
    /// A malformed file is rejected before anything changes.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let uploaded = parse_upload(json)?;
        Ok(self.store.merge(uploaded)?)
    }
}
