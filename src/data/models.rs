//! Boat and review records plus the edit types that flow back to the
//! data service.
//!
//! Records use the data service's field names on the wire (`Name`,
//! `Price__c`, ...) so that payloads round-trip without a mapping layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque record identity assigned by the data service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A boat listed for sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoatRecord {
    /// Record identity.
    #[serde(rename = "Id")]
    pub id: RecordId,
    /// Display name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Length in feet.
    #[serde(rename = "Length__c", default)]
    pub length: Option<f64>,
    /// Asking price in the org currency.
    #[serde(rename = "Price__c", default)]
    pub price: Option<f64>,
    /// Free-text description.
    #[serde(rename = "Description__c", default)]
    pub description: Option<String>,
    /// Boat type the record is filed under.
    #[serde(rename = "BoatType__c", default)]
    pub boat_type_id: Option<RecordId>,
}

/// Reviewer reference embedded in a review payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    /// Reviewer display name.
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

/// A review left on a boat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review identity.
    #[serde(rename = "Id")]
    pub id: RecordId,
    /// Boat the review belongs to.
    #[serde(rename = "Boat__c")]
    pub boat_id: RecordId,
    /// User who wrote the review.
    #[serde(rename = "CreatedById")]
    pub reviewer_id: RecordId,
    /// Reviewer details, when the service expands them.
    #[serde(rename = "CreatedBy", default)]
    pub reviewer: Option<ReviewAuthor>,
    /// Review headline.
    #[serde(rename = "Name", default)]
    pub title: Option<String>,
    /// Star rating.
    #[serde(rename = "Rating__c", default)]
    pub rating: Option<u8>,
    /// Review body.
    #[serde(rename = "Comment__c", default)]
    pub comment: Option<String>,
}

impl ReviewRecord {
    /// Returns the reviewer's display name if the service provided one.
    #[must_use]
    pub fn reviewer_name(&self) -> Option<&str> {
        self.reviewer.as_ref().and_then(|author| author.name.as_deref())
    }
}

/// Boat type filter driving the result-set query.
///
/// An empty type identifier selects every boat.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoatTypeFilter {
    /// No filter: every boat.
    #[default]
    All,
    /// Only boats of the given type.
    Type(RecordId),
}

impl BoatTypeFilter {
    /// Builds a filter from a raw type identifier, treating blank input as
    /// [`BoatTypeFilter::All`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::All
        } else {
            Self::Type(RecordId::new(trimmed))
        }
    }

    /// Value sent as the `boatTypeId` query parameter.
    #[must_use]
    pub fn query_value(&self) -> &str {
        match self {
            Self::All => "",
            Self::Type(id) => id.as_str(),
        }
    }

    /// Returns a human-readable label for display.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::All => "All types".to_owned(),
            Self::Type(id) => format!("Type: {id}"),
        }
    }
}

/// Columns that the results table allows editing in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    /// `Name`
    Name,
    /// `Length__c`
    Length,
    /// `Price__c`
    Price,
    /// `Description__c`
    Description,
}

/// Changed fields of a single boat row. Unset fields are never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoatChanges {
    /// New name.
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New length.
    #[serde(rename = "Length__c", skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// New price.
    #[serde(rename = "Price__c", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// New description.
    #[serde(rename = "Description__c", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BoatChanges {
    /// Returns true when no field has been changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.length.is_none()
            && self.price.is_none()
            && self.description.is_none()
    }

    /// Lists the fields carried by this changeset.
    #[must_use]
    pub fn fields(&self) -> Vec<EditableField> {
        [
            (self.name.is_some(), EditableField::Name),
            (self.length.is_some(), EditableField::Length),
            (self.price.is_some(), EditableField::Price),
            (self.description.is_some(), EditableField::Description),
        ]
        .into_iter()
        .filter_map(|(present, field)| present.then_some(field))
        .collect()
    }

    /// Overlays `other` onto `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Self) {
        let Self {
            name,
            length,
            price,
            description,
        } = other;
        if name.is_some() {
            self.name = name;
        }
        if length.is_some() {
            self.length = length;
        }
        if price.is_some() {
            self.price = price;
        }
        if description.is_some() {
            self.description = description;
        }
    }
}

/// A pending inline edit for one boat row.
///
/// The row identity is fixed at construction; only the changed fields are
/// recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEdit {
    id: RecordId,
    changes: BoatChanges,
}

impl DraftEdit {
    /// Starts an empty changeset for the given row.
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            changes: BoatChanges::default(),
        }
    }

    /// Records a new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.changes.name = Some(name.into());
        self
    }

    /// Records a new length.
    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.changes.length = Some(length);
        self
    }

    /// Records a new price.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.changes.price = Some(price);
        self
    }

    /// Records a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.changes.description = Some(description.into());
        self
    }

    /// Row identity.
    #[must_use]
    pub const fn id(&self) -> &RecordId {
        &self.id
    }

    /// Fields changed so far.
    #[must_use]
    pub const fn changes(&self) -> &BoatChanges {
        &self.changes
    }

    /// Folds a later edit of the same row into this one.
    ///
    /// Returns the other edit unchanged when it targets a different row.
    ///
    /// # Errors
    ///
    /// Hands `other` back when its identity differs from `self`.
    pub fn absorb(&mut self, other: Self) -> Result<(), Self> {
        if other.id != self.id {
            return Err(other);
        }
        self.changes.merge(other.changes);
        Ok(())
    }

    /// Converts the draft into the request sent to the data service.
    #[must_use]
    pub fn into_update(self) -> RecordUpdate {
        RecordUpdate {
            id: self.id,
            fields: self.changes,
        }
    }
}

/// Field-level update request for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordUpdate {
    /// Record being updated.
    #[serde(rename = "Id")]
    pub id: RecordId,
    /// Changed fields only.
    #[serde(flatten)]
    pub fields: BoatChanges,
}
