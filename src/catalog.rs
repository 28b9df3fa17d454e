//! Catalog

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

new_key_type! {
    /// Subject Key
    pub struct SubjectKey;
}

/// Errors raised while resolving catalog entries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The subject does not exist in the catalog.
    #[error("Subject not found: {0}")]
    UnknownSubject(String),

    /// The subject exists but the department does not offer it.
    #[error("Subject {0} is not offered by the {1} department")]
    NotOffered(String, Department),
}

/// Certificate examination level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamLevel {
    /// CGCE Ordinary Level
    OrdinaryLevel,

    /// CGCE Advanced Level
    AdvancedLevel,
}

impl ExamLevel {
    /// Display name as printed on registration forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExamLevel::OrdinaryLevel => "CGCE Ordinary Level",
            ExamLevel::AdvancedLevel => "CGCE Advanced Level",
        }
    }
}

impl fmt::Display for ExamLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Department a candidate registers under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    /// Science department
    Science,

    /// Arts department
    Arts,

    /// Commercial department
    Commercial,

    /// Technical department
    Technical,
}

impl Department {
    /// Lowercase department name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Department::Science => "science",
            Department::Arts => "arts",
            Department::Commercial => "commercial",
            Department::Technical => "technical",
        }
    }

    /// All departments.
    pub const ALL: [Department; 4] = [
        Department::Science,
        Department::Arts,
        Department::Commercial,
        Department::Technical,
    ];
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject in the examination catalog.
#[derive(Debug, Clone)]
pub struct Subject {
    /// Subject name as printed on the registration form.
    pub name: String,

    /// Departments that offer the subject.
    pub departments: SmallVec<[Department; 4]>,
}

impl Subject {
    /// Whether the given department offers this subject.
    #[must_use]
    pub fn offered_by(&self, department: Department) -> bool {
        self.departments.contains(&department)
    }
}

/// Subject catalog for an examination session.
#[derive(Debug)]
pub struct Catalog {
    /// `SlotMap` storing the subjects with generated keys
    subjects: SlotMap<SubjectKey, Subject>,

    /// Subject name -> `SlotMap` key mapping for lookups
    subject_keys: FxHashMap<String, SubjectKey>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subjects: SlotMap::with_key(),
            subject_keys: FxHashMap::default(),
        }
    }

    /// The standard CGCE catalog, with each department's subject list.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        for (department, names) in [
            (Department::Science, SCIENCE_SUBJECTS.as_slice()),
            (Department::Arts, ARTS_SUBJECTS.as_slice()),
            (Department::Commercial, COMMERCIAL_SUBJECTS.as_slice()),
            (Department::Technical, TECHNICAL_SUBJECTS.as_slice()),
        ] {
            for name in names {
                catalog.offer(name, department);
            }
        }

        catalog
    }

    /// Record that a department offers a subject, adding the subject if new.
    pub fn offer(&mut self, name: &str, department: Department) -> SubjectKey {
        if let Some(key) = self.subject_keys.get(name) {
            if let Some(subject) = self.subjects.get_mut(*key)
                && !subject.offered_by(department)
            {
                subject.departments.push(department);
            }

            return *key;
        }

        let key = self.subjects.insert(Subject {
            name: name.to_string(),
            departments: smallvec![department],
        });

        self.subject_keys.insert(name.to_string(), key);

        key
    }

    /// Get a subject by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSubject`] if the subject is not in the catalog.
    pub fn subject(&self, name: &str) -> Result<&Subject, CatalogError> {
        let key = self
            .subject_keys
            .get(name)
            .ok_or_else(|| CatalogError::UnknownSubject(name.to_string()))?;

        self.subjects
            .get(*key)
            .ok_or_else(|| CatalogError::UnknownSubject(name.to_string()))
    }

    /// Get a subject key by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSubject`] if the subject is not in the catalog.
    pub fn subject_key(&self, name: &str) -> Result<SubjectKey, CatalogError> {
        self.subject_keys
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownSubject(name.to_string()))
    }

    /// Get a subject by name, checking that the department offers it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSubject`] if the subject is not in the
    /// catalog, or [`CatalogError::NotOffered`] if the department does not
    /// offer it.
    pub fn ensure_offered(
        &self,
        name: &str,
        department: Department,
    ) -> Result<&Subject, CatalogError> {
        let subject = self.subject(name)?;

        if subject.offered_by(department) {
            Ok(subject)
        } else {
            Err(CatalogError::NotOffered(name.to_string(), department))
        }
    }

    /// Iterate over the subjects a department offers.
    pub fn offered(&self, department: Department) -> impl Iterator<Item = &Subject> {
        self.subjects
            .values()
            .filter(move |subject| subject.offered_by(department))
    }

    /// Number of subjects in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the catalog has no subjects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

const SCIENCE_SUBJECTS: [&str; 17] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Additional Mathematics",
    "Human Biology",
    "Agricultural Science",
    "Geology",
    "Geography",
    "Technical Drawing",
    "Food and Nutrition",
    "Electronics",
    "Computer Science",
    "Statistics",
    "Environmental Science",
    "English Language",
    "French",
];

const ARTS_SUBJECTS: [&str; 18] = [
    "Literature in English",
    "French Literature",
    "History",
    "Geography",
    "Religious Studies",
    "Citizenship Education",
    "Physical Education (PE)",
    "Logic (Philosophy)",
    "Economics",
    "Commerce",
    "Accounting",
    "Food and Nutrition",
    "Business Mathematics",
    "Mathematics",
    "French",
    "Government",
    "Sociology",
    "English Language",
];

const COMMERCIAL_SUBJECTS: [&str; 15] = [
    "Business Mathematics",
    "Accounting",
    "Economics",
    "Business Management",
    "Commerce",
    "Commerce and Finance",
    "Marketing",
    "Banking & Finance",
    "Entrepreneurship",
    "Business Law",
    "Typewriting",
    "Mathematics",
    "Computer Science",
    "English Language",
    "Food Science",
];

const TECHNICAL_SUBJECTS: [&str; 21] = [
    "Information & Communication Technology",
    "Engineering Science",
    "Woodwork",
    "Technical Drawing",
    "Metalwork",
    "Building Construction",
    "Electrical Installation",
    "Auto Mechanics",
    "Clothing & Textiles",
    "Food & Nutrition",
    "Electronics",
    "Electricity",
    "Plumbing & Pipe Fitting",
    "Mathematics",
    "French",
    "English Language",
    "Chemistry",
    "Physics",
    "Biology",
    "Computer Science",
    "Accounting",
];
